//! Identity store subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers / lightweight proxies
//!     → CountingStore (bills the request's QueryCounter)
//!     → dyn IdentityStore (MemoryStore, or any relational backend)
//! ```
//!
//! # Design Decisions
//! - Lookups are synchronous and keyed by primary key only
//! - A missing row is `Ok(None)`, not an error
//! - The store is shared across requests; proxies built on it are not

pub mod counting;
pub mod memory;
pub mod records;

use thiserror::Error;

pub use counting::{CountingStore, QueryCounter};
pub use memory::MemoryStore;
pub use records::{Team, TeamId, User, UserId};

/// Errors raised by an identity store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Durable record of users and teams, addressable by primary key.
pub trait IdentityStore: Send + Sync {
    /// Find a user by primary key.
    fn find_user(&self, uid: UserId) -> Result<Option<User>, StoreError>;

    /// Find a team by primary key.
    fn find_team(&self, tid: TeamId) -> Result<Option<Team>, StoreError>;

    /// Write a user row back.
    fn save_user(&self, user: &User) -> Result<(), StoreError>;

    /// Write a team row back.
    fn save_team(&self, team: &Team) -> Result<(), StoreError>;
}
