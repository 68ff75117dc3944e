//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response:
//!     → headers.rs (CSP, frame and XSS protection headers)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Header values are computed once at startup and shared
//! - Headers are added to every response, errors included

pub mod headers;

pub use headers::{CspPolicy, SecurityHeaders, DEFAULT_CSP_POLICY};
