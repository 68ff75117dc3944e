//! Metrics collection and exposition.
//!
//! # Metrics
//! - `scoreboard_store_queries_total` (counter): store statements by entity
//! - `scoreboard_session_persist_total` (counter): persister outcomes
//! - `scoreboard_request_queries` (histogram): statements per request

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_store_query(entity: &'static str) {
    metrics::counter!("scoreboard_store_queries_total", "entity" => entity).increment(1);
}

pub fn record_persist_outcome(outcome: &'static str) {
    metrics::counter!("scoreboard_session_persist_total", "outcome" => outcome).increment(1);
}

pub fn record_request_queries(count: usize) {
    metrics::histogram!("scoreboard_request_queries").record(count as f64);
}
