//! Scoreboard request-lifecycle gate library.

pub mod config;
pub mod context;
pub mod gametime;
pub mod http;
pub mod lifecycle;
pub mod lightweight;
pub mod observability;
pub mod security;
pub mod session;
pub mod store;

pub use config::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
