//! Per-request statement counting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::observability::metrics;
use crate::store::{IdentityStore, StoreError, Team, TeamId, User, UserId};

/// Number of store statements issued while handling one request.
///
/// Created by the query counting middleware and carried in request
/// extensions; clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct QueryCounter(Arc<AtomicUsize>);

impl QueryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

/// Store wrapper that bills every statement to a request's counter.
pub struct CountingStore {
    inner: Arc<dyn IdentityStore>,
    counter: QueryCounter,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn IdentityStore>, counter: QueryCounter) -> Self {
        Self { inner, counter }
    }

    fn bill(&self, entity: &'static str) {
        self.counter.record();
        metrics::record_store_query(entity);
    }
}

impl IdentityStore for CountingStore {
    fn find_user(&self, uid: UserId) -> Result<Option<User>, StoreError> {
        self.bill("user");
        self.inner.find_user(uid)
    }

    fn find_team(&self, tid: TeamId) -> Result<Option<Team>, StoreError> {
        self.bill("team");
        self.inner.find_team(tid)
    }

    fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.bill("user");
        self.inner.save_user(user)
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        self.bill("team");
        self.inner.save_team(team)
    }
}
