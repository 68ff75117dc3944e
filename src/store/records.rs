//! User and team rows as held by the identity store.

use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type TeamId = i64;

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: UserId,
    pub email: String,
    pub nick: String,
    #[serde(default)]
    pub admin: bool,
    /// Owning team, if the player has joined one.
    #[serde(default)]
    pub team_tid: Option<TeamId>,
}

/// A team of players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub tid: TeamId,
    pub name: String,
}
