//! Team proxy.

use serde_json::{json, Value};

use crate::lightweight::proxy::{key_as_i64, Entity, Proxy, ProxyError};
use crate::store::{IdentityStore, StoreError, Team, TeamId};

pub type TeamProxy = Proxy<Team>;

impl Entity for Team {
    const KIND: &'static str = "Team";
    const FIELDS: &'static [&'static str] = &["tid", "name"];
    const KEY: &'static str = "tid";

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "tid" => Some(json!(self.tid)),
            "name" => Some(json!(self.name)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), ProxyError> {
        match name {
            "name" => {
                self.name = serde_json::from_value(value)
                    .map_err(|e| ProxyError::invalid::<Self>(name, e))?;
                Ok(())
            }
            "tid" => Err(ProxyError::ReadOnlyField {
                kind: Self::KIND,
                field: name.to_string(),
            }),
            _ => Err(ProxyError::UnknownField {
                kind: Self::KIND,
                field: name.to_string(),
            }),
        }
    }

    fn fetch(store: &dyn IdentityStore, key: &Value) -> Result<Option<Self>, ProxyError> {
        match key_as_i64(key) {
            Some(tid) => Ok(store.find_team(tid)?),
            None => Ok(None),
        }
    }

    fn save(&self, store: &dyn IdentityStore) -> Result<(), StoreError> {
        store.save_team(self)
    }
}

impl Proxy<Team> {
    pub fn tid(&mut self) -> Result<TeamId, ProxyError> {
        self.read_as("tid")
    }

    pub fn name(&mut self) -> Result<String, ProxyError> {
        self.read_as("name")
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ProxyError> {
        self.write("name", json!(name))
    }
}
