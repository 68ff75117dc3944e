//! Per-request identity context.
//!
//! # Data Flow
//! ```text
//! Request
//!     → middleware.rs: decode session cookie
//!     → loader.rs: session → Identity (user/team proxies)
//!     → RequestContext inserted into extensions
//!     → [handler reads/mutates identity and session]
//!     → persister.rs: Identity → session keys (best effort)
//!     → middleware.rs: Set-Cookie when the session changed
//! ```
//!
//! # Design Decisions
//! - Proxies live only for one request and are never shared across requests
//! - An empty or unreadable session means anonymous, never an error
//! - Persisting never fails the response

pub mod loader;
pub mod middleware;
pub mod persister;

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};
use tokio::sync::{Mutex, MutexGuard};

use crate::lightweight::{TeamProxy, UserProxy};
use crate::session::Session;
use crate::store::IdentityStore;

pub use loader::load_identity;
pub use middleware::{identity_middleware, IdentityState};
pub use persister::{persist_identity, PersistOutcome};

/// The active user and team for this request.
#[derive(Debug, Default)]
pub struct Identity {
    pub user: Option<UserProxy>,
    pub team: Option<TeamProxy>,
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.team = None;
    }
}

struct Inner {
    store: Arc<dyn IdentityStore>,
    session: Mutex<Session>,
    identity: Mutex<Identity>,
}

/// Request-scoped state shared between the identity middleware and the
/// handler. Clones refer to the same request.
#[derive(Clone)]
pub struct RequestContext(Arc<Inner>);

impl RequestContext {
    pub fn new(store: Arc<dyn IdentityStore>, session: Session, identity: Identity) -> Self {
        Self(Arc::new(Inner {
            store,
            session: Mutex::new(session),
            identity: Mutex::new(identity),
        }))
    }

    /// Store handle for this request; statements are counted when query
    /// counting is on.
    pub fn store(&self) -> Arc<dyn IdentityStore> {
        self.0.store.clone()
    }

    pub async fn session(&self) -> MutexGuard<'_, Session> {
        self.0.session.lock().await
    }

    pub async fn identity(&self) -> MutexGuard<'_, Identity> {
        self.0.identity.lock().await
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestContext>().cloned().ok_or_else(|| {
            tracing::error!("RequestContext missing; identity middleware not installed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}
