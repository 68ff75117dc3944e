//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → queries.rs (per-request store statement count, debug only)
//! ```

pub mod logging;
pub mod metrics;
pub mod queries;

pub use queries::count_queries_middleware;
