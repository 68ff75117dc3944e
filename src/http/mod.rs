//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → api.rs (JSON handlers over the request identity)
//!     → error.rs (ApiError → status + JSON body)
//!     → Send to client
//! ```

pub mod api;
pub mod error;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, AppState, HttpServer, ServerError};
