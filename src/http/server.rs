//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware in lifecycle order
//! - Bind server to listener and shut down gracefully
//!
//! # Layer order (outermost first)
//! ```text
//! trace → query counter (optional) → security headers → timeout
//!       → identity (load / persist) → handler
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::header::InvalidHeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GateConfig;
use crate::context::{identity_middleware, IdentityState};
use crate::gametime::GameTime;
use crate::http::api;
use crate::observability::count_queries_middleware;
use crate::security::SecurityHeaders;
use crate::session::SessionCodec;
use crate::store::IdentityStore;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("CSP policy is not a valid header value: {0}")]
    InvalidPolicy(#[from] InvalidHeaderValue),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub game: GameTime,
}

/// HTTP server for the scoreboard.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the given identity store.
    pub fn new(config: GateConfig, store: Arc<dyn IdentityStore>) -> Result<Self, ServerError> {
        let router = build_router(&config, store)?;
        Ok(Self { router })
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Everything derived from config (CSP header, signing key) is resolved
/// here, once.
#[allow(deprecated)]
pub fn build_router(
    config: &GateConfig,
    store: Arc<dyn IdentityStore>,
) -> Result<Router, ServerError> {
    let headers = SecurityHeaders::from_config(&config.security)?;
    let identity = IdentityState {
        store,
        codec: Arc::new(SessionCodec::from_config(&config.session)),
    };
    let state = AppState {
        game: GameTime::from(&config.game),
    };

    let router = Router::new()
        .route("/health", get(api::health))
        .route("/api/session", get(api::session_view))
        .route("/api/login", post(api::login))
        .route("/api/logout", post(api::logout))
        .route("/api/me/nick", put(api::update_nick))
        .with_state(state)
        .layer(middleware::from_fn_with_state(identity, identity_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.listener.request_timeout_secs,
        )));

    let mut router = headers.apply(router);
    if config.observability.count_queries {
        router = router.layer(middleware::from_fn(count_queries_middleware));
    }
    Ok(router.layer(TraceLayer::new_for_http()))
}
