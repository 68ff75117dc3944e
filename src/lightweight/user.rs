//! User proxy: the identity carried in every session.

use serde_json::{json, Value};

use crate::lightweight::proxy::{key_as_i64, Entity, Proxy, ProxyError};
use crate::store::{IdentityStore, StoreError, TeamId, User, UserId};

pub type UserProxy = Proxy<User>;

impl Entity for User {
    const KIND: &'static str = "User";
    const FIELDS: &'static [&'static str] = &["uid", "email", "nick", "admin", "team_tid"];
    const KEY: &'static str = "uid";

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "uid" => Some(json!(self.uid)),
            "email" => Some(json!(self.email)),
            "nick" => Some(json!(self.nick)),
            "admin" => Some(json!(self.admin)),
            "team_tid" => Some(json!(self.team_tid)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), ProxyError> {
        let decode = |e: serde_json::Error| ProxyError::invalid::<Self>(name, e);
        match name {
            "email" => self.email = serde_json::from_value(value).map_err(decode)?,
            "nick" => self.nick = serde_json::from_value(value).map_err(decode)?,
            "admin" => self.admin = serde_json::from_value(value).map_err(decode)?,
            "team_tid" => self.team_tid = serde_json::from_value(value).map_err(decode)?,
            "uid" => {
                return Err(ProxyError::ReadOnlyField {
                    kind: Self::KIND,
                    field: name.to_string(),
                })
            }
            _ => {
                return Err(ProxyError::UnknownField {
                    kind: Self::KIND,
                    field: name.to_string(),
                })
            }
        }
        Ok(())
    }

    fn fetch(store: &dyn IdentityStore, key: &Value) -> Result<Option<Self>, ProxyError> {
        match key_as_i64(key) {
            Some(uid) => Ok(store.find_user(uid)?),
            None => Ok(None),
        }
    }

    fn save(&self, store: &dyn IdentityStore) -> Result<(), StoreError> {
        store.save_user(self)
    }
}

impl Proxy<User> {
    pub fn uid(&mut self) -> Result<UserId, ProxyError> {
        self.read_as("uid")
    }

    pub fn email(&mut self) -> Result<String, ProxyError> {
        self.read_as("email")
    }

    pub fn nick(&mut self) -> Result<String, ProxyError> {
        self.read_as("nick")
    }

    pub fn admin(&mut self) -> Result<bool, ProxyError> {
        self.read_as("admin")
    }

    pub fn team_tid(&mut self) -> Result<Option<TeamId>, ProxyError> {
        self.read_as("team_tid")
    }

    pub fn set_email(&mut self, email: &str) -> Result<(), ProxyError> {
        self.write("email", json!(email))
    }

    pub fn set_nick(&mut self, nick: &str) -> Result<(), ProxyError> {
        self.write("nick", json!(nick))
    }

    pub fn set_admin(&mut self, admin: bool) -> Result<(), ProxyError> {
        self.write("admin", json!(admin))
    }

    pub fn set_team_tid(&mut self, tid: Option<TeamId>) -> Result<(), ProxyError> {
        self.write("team_tid", json!(tid))
    }
}
