//! Client-held session blob.
//!
//! # Data Flow
//! ```text
//! Cookie header
//!     → cookie.rs (verify signature, decode)
//!     → Session (key/value map, tracks modification)
//!     → [loader / handlers / persister read and write keys]
//!     → cookie.rs (encode, sign) → Set-Cookie, only when modified
//! ```

pub mod cookie;

use serde_json::{Map, Value};

pub use cookie::{SessionCodec, SessionError};

/// Raw user primary key, written at login.
pub const UID_KEY: &str = "uid";
/// Serialized user snapshot.
pub const USER_KEY: &str = "user";
/// Serialized team snapshot, or a raw team primary key.
pub const TEAM_KEY: &str = "team";

/// Decoded session contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    data: Map<String, Value>,
    modified: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap contents decoded from a cookie; starts unmodified.
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self {
            data,
            modified: false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Set a key. Storing an equal value does not mark the session modified.
    pub fn insert(&mut self, key: &str, value: Value) {
        if self.data.get(key) != Some(&value) {
            self.data.insert(key.to_string(), value);
            self.modified = true;
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.data.remove(key);
        if removed.is_some() {
            self.modified = true;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.data.is_empty() {
            self.data.clear();
            self.modified = true;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }
}
