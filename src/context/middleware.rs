//! Identity middleware: load before the handler, persist after it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::context::{load_identity, persist_identity, PersistOutcome, RequestContext};
use crate::observability::metrics;
use crate::session::SessionCodec;
use crate::store::{CountingStore, IdentityStore, QueryCounter};

/// State required by the identity middleware.
#[derive(Clone)]
pub struct IdentityState {
    pub store: Arc<dyn IdentityStore>,
    pub codec: Arc<SessionCodec>,
}

pub async fn identity_middleware(
    State(state): State<IdentityState>,
    mut req: Request,
    next: Next,
) -> Response {
    let session = state.codec.read_request(req.headers());

    // Bill this request's statements when query counting is mounted.
    let store: Arc<dyn IdentityStore> = match req.extensions().get::<QueryCounter>() {
        Some(counter) => Arc::new(CountingStore::new(state.store.clone(), counter.clone())),
        None => state.store.clone(),
    };

    let identity = load_identity(&session, &store);
    let ctx = RequestContext::new(store, session, identity);
    req.extensions_mut().insert(ctx.clone());

    let mut response = next.run(req).await;

    let mut session = ctx.session().await;
    let outcome = {
        let identity = ctx.identity().await;
        persist_identity(&identity, &mut session)
    };
    metrics::record_persist_outcome(outcome.as_str());
    if outcome != PersistOutcome::Persisted {
        tracing::debug!(outcome = outcome.as_str(), "Session identity not persisted");
    }

    if session.is_modified() {
        match state.codec.set_cookie(&session) {
            Ok(cookie) => {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            Err(e) => tracing::warn!(error = %e, "Session cookie not written"),
        }
    }

    response
}
