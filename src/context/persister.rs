//! Write the request identity back into the session blob.

use serde_json::Value;

use crate::context::Identity;
use crate::lightweight::{Entity, Snapshot};
use crate::session::{Session, TEAM_KEY, USER_KEY};
use crate::store::{Team, User};

/// What happened to the identity at the end of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Both snapshots were written.
    Persisted,
    /// No user or no team on the request; the session is left alone.
    SkippedAbsentIdentity,
    /// A snapshot could not be stored in a form the loader can resolve.
    SkippedSerialization,
}

impl PersistOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistOutcome::Persisted => "persisted",
            PersistOutcome::SkippedAbsentIdentity => "skipped_absent_identity",
            PersistOutcome::SkippedSerialization => "skipped_serialization",
        }
    }
}

fn resolvable<E: Entity>(snapshot: &Snapshot) -> bool {
    snapshot.get(E::KEY).is_some_and(|k| !k.is_null())
}

/// Store the user and team snapshots under `user` and `team`.
///
/// All or nothing: when either side is missing or unusable nothing is
/// written and the outcome says why.
pub fn persist_identity(identity: &Identity, session: &mut Session) -> PersistOutcome {
    let (Some(user), Some(team)) = (&identity.user, &identity.team) else {
        return PersistOutcome::SkippedAbsentIdentity;
    };

    let (user, team) = (user.to_json(), team.to_json());
    if !resolvable::<User>(user) || !resolvable::<Team>(team) {
        return PersistOutcome::SkippedSerialization;
    }

    session.insert(USER_KEY, Value::Object(user.clone()));
    session.insert(TEAM_KEY, Value::Object(team.clone()));
    PersistOutcome::Persisted
}
