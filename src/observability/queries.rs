//! Debug-only query counting middleware.
//!
//! Mounted only when `observability.count_queries` is set. Never alters the
//! response.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::observability::metrics;
use crate::store::QueryCounter;

pub async fn count_queries_middleware(mut req: Request, next: Next) -> Response {
    let counter = QueryCounter::new();
    req.extensions_mut().insert(counter.clone());

    let response = next.run(req).await;

    let count = counter.get();
    if count > 0 {
        tracing::info!(queries = count, "Request issued {} queries.", count);
        metrics::record_request_queries(count);
    }
    response
}
