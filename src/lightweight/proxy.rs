//! Read-through proxy over a single identity store row.
//!
//! A proxy keeps a snapshot of a fixed field set so that the common reads
//! (who is logged in, which team) never touch the store. Reads that miss the
//! snapshot resolve the row by primary key, refresh the snapshot from it and
//! answer from the row. Writes go to the row, are saved, and refresh the
//! snapshot.
//!
//! Proxies are request-local. The miss path (fetch, copy, retry) is not
//! atomic, so an instance must never be shared between requests.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::store::{IdentityStore, StoreError};

/// Plain field → value mapping carried in the session blob.
pub type Snapshot = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Could not find underlying representation for {kind}")]
    NotFound { kind: &'static str },
    #[error("{kind} has no field {field:?}")]
    UnknownField { kind: &'static str, field: String },
    #[error("{kind}.{field} cannot be written")]
    ReadOnlyField { kind: &'static str, field: String },
    #[error("invalid value for {kind}.{field}: {source}")]
    InvalidValue {
        kind: &'static str,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} proxy has no backing row to write to")]
    Unbacked { kind: &'static str },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProxyError {
    pub(crate) fn invalid<E: Entity>(field: &str, source: serde_json::Error) -> Self {
        ProxyError::InvalidValue {
            kind: E::KIND,
            field: field.to_string(),
            source,
        }
    }
}

/// A store row that can sit behind a [`Proxy`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Type name used in errors.
    const KIND: &'static str;

    /// Fields copied into the snapshot.
    const FIELDS: &'static [&'static str];

    /// Snapshot field holding the primary key.
    const KEY: &'static str;

    /// Current value of a field, `None` if the entity has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    /// Assign a field in place.
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), ProxyError>;

    /// Look the row up by the primary key found in a snapshot.
    fn fetch(store: &dyn IdentityStore, key: &Value) -> Result<Option<Self>, ProxyError>;

    /// Persist the row.
    fn save(&self, store: &dyn IdentityStore) -> Result<(), StoreError>;
}

pub struct Proxy<E: Entity> {
    store: Arc<dyn IdentityStore>,
    wrapped: Option<E>,
    snapshot: Snapshot,
}

impl<E: Entity> Proxy<E> {
    /// Wrap a row, or nothing.
    pub fn new(store: Arc<dyn IdentityStore>, wrapped: Option<E>) -> Self {
        let snapshot = Self::load(wrapped.as_ref());
        Self {
            store,
            wrapped,
            snapshot,
        }
    }

    /// Rebuild a proxy from a serialized snapshot without touching the store.
    ///
    /// Anything other than a JSON object yields an empty snapshot.
    pub fn from_json(store: Arc<dyn IdentityStore>, value: Value) -> Self {
        let snapshot = match value {
            Value::Object(map) => map,
            _ => Snapshot::new(),
        };
        Self {
            store,
            wrapped: None,
            snapshot,
        }
    }

    /// The snapshot as stored in the session.
    pub fn to_json(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Whether a store row is currently attached.
    pub fn is_backed(&self) -> bool {
        self.wrapped.is_some()
    }

    /// Attach the backing row (fetching it by primary key if needed) and
    /// refresh the snapshot from it.
    pub fn resolve(&mut self) -> Result<&E, ProxyError> {
        if self.wrapped.is_none() {
            let key = self
                .snapshot
                .get(E::KEY)
                .ok_or(ProxyError::NotFound { kind: E::KIND })?;
            let row = E::fetch(self.store.as_ref(), key)?
                .ok_or(ProxyError::NotFound { kind: E::KIND })?;
            self.wrapped = Some(row);
        }
        self.snapshot = Self::load(self.wrapped.as_ref());
        self.wrapped
            .as_ref()
            .ok_or(ProxyError::NotFound { kind: E::KIND })
    }

    /// Read a field, from the snapshot when possible.
    pub fn read(&mut self, field: &str) -> Result<Value, ProxyError> {
        if let Some(value) = self.snapshot.get(field) {
            return Ok(value.clone());
        }
        let row = self.resolve()?;
        row.field(field).ok_or_else(|| ProxyError::UnknownField {
            kind: E::KIND,
            field: field.to_string(),
        })
    }

    /// Read a field and decode it.
    pub fn read_as<T: DeserializeOwned>(&mut self, field: &str) -> Result<T, ProxyError> {
        let value = self.read(field)?;
        serde_json::from_value(value).map_err(|e| ProxyError::invalid::<E>(field, e))
    }

    /// Write a field through to the backing row and refresh the snapshot.
    pub fn write(&mut self, field: &str, value: Value) -> Result<(), ProxyError> {
        let row = self
            .wrapped
            .as_mut()
            .ok_or(ProxyError::Unbacked { kind: E::KIND })?;
        row.set_field(field, value)?;
        row.save(self.store.as_ref())?;
        self.snapshot = Self::load(self.wrapped.as_ref());
        Ok(())
    }

    fn load(wrapped: Option<&E>) -> Snapshot {
        let Some(row) = wrapped else {
            return Snapshot::new();
        };
        E::FIELDS
            .iter()
            .filter_map(|name| row.field(name).map(|v| (name.to_string(), v)))
            .collect()
    }
}

impl<E: Entity> fmt::Debug for Proxy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("kind", &E::KIND)
            .field("backed", &self.wrapped.is_some())
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

/// Decode a primary key held in a snapshot.
pub(crate) fn key_as_i64(key: &Value) -> Option<i64> {
    match key {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
