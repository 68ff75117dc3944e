//! In-memory identity store, optionally seeded from a JSON fixture.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;

use crate::store::{IdentityStore, StoreError, Team, TeamId, User, UserId};

/// Fixture file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Seed {
    users: Vec<User>,
    teams: Vec<Team>,
}

/// A thread-safe identity store backed by concurrent maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<UserId, User>>,
    teams: Arc<DashMap<TeamId, Team>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load users and teams from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        let seed: Seed = serde_json::from_reader(BufReader::new(file))?;

        let store = Self::new();
        for user in seed.users {
            store.insert_user(user);
        }
        for team in seed.teams {
            store.insert_team(team);
        }
        tracing::info!(
            users = store.users.len(),
            teams = store.teams.len(),
            "Loaded identity store seed"
        );
        Ok(store)
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.uid, user);
    }

    pub fn insert_team(&self, team: Team) {
        self.teams.insert(team.tid, team);
    }

    pub fn remove_user(&self, uid: UserId) -> Option<User> {
        self.users.remove(&uid).map(|(_, user)| user)
    }
}

impl IdentityStore for MemoryStore {
    fn find_user(&self, uid: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&uid).map(|r| r.value().clone()))
    }

    fn find_team(&self, tid: TeamId) -> Result<Option<Team>, StoreError> {
        Ok(self.teams.get(&tid).map(|r| r.value().clone()))
    }

    fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.users.insert(user.uid, user.clone());
        Ok(())
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        self.teams.insert(team.tid, team.clone());
        Ok(())
    }
}
