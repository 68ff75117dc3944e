//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build store → Build router → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → server stops accepting and drains
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
