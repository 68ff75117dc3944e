//! Lightweight proxies kept in the session to avoid a store hit on every
//! request.

pub mod proxy;
pub mod team;
pub mod user;

pub use proxy::{Entity, Proxy, ProxyError, Snapshot};
pub use team::TeamProxy;
pub use user::UserProxy;
