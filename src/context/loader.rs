//! Rebuild the request identity from the session blob.

use std::sync::Arc;

use serde_json::Value;

use crate::context::Identity;
use crate::lightweight::proxy::key_as_i64;
use crate::lightweight::{TeamProxy, UserProxy};
use crate::session::{Session, TEAM_KEY, UID_KEY, USER_KEY};
use crate::store::IdentityStore;

/// Session values that count as set: not null, false, zero or empty.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Build the user and team proxies for a request.
///
/// A user snapshot is used as is, without touching the store. Failing that,
/// a raw `uid` is resolved with one user lookup. The team is only loaded
/// alongside a user; see [`load_team`].
pub fn load_identity(session: &Session, store: &Arc<dyn IdentityStore>) -> Identity {
    let mut identity = Identity::default();

    if let Some(user) = session.get(USER_KEY).filter(|v| is_set(v)) {
        identity.user = Some(UserProxy::from_json(store.clone(), user.clone()));
        identity.team = load_team(session, store);
    } else if let Some(uid) = session.get(UID_KEY).filter(|v| is_set(v)) {
        let Some(uid) = key_as_i64(uid) else {
            tracing::debug!(uid = %uid, "Ignoring non-numeric session uid");
            return identity;
        };
        match store.find_user(uid) {
            Ok(Some(user)) => {
                identity.user = Some(UserProxy::new(store.clone(), Some(user)));
                identity.team = load_team(session, store);
            }
            Ok(None) => tracing::debug!(uid, "Session uid has no matching user"),
            Err(e) => tracing::warn!(uid, error = %e, "User lookup failed; continuing anonymous"),
        }
    }

    identity
}

/// A team snapshot is deserialized; a scalar is a raw team key and is
/// resolved through the store.
fn load_team(session: &Session, store: &Arc<dyn IdentityStore>) -> Option<TeamProxy> {
    let team = session.get(TEAM_KEY).filter(|v| is_set(v))?;
    if team.is_object() {
        return Some(TeamProxy::from_json(store.clone(), team.clone()));
    }

    let tid = key_as_i64(team)?;
    match store.find_team(tid) {
        Ok(Some(row)) => Some(TeamProxy::new(store.clone(), Some(row))),
        Ok(None) => {
            tracing::debug!(tid, "Session team has no matching row");
            None
        }
        Err(e) => {
            tracing::warn!(tid, error = %e, "Team lookup failed");
            None
        }
    }
}
