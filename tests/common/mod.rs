//! Shared fixtures for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use scoreboard_gate::config::GateConfig;
use scoreboard_gate::store::{IdentityStore, MemoryStore, StoreError, Team, TeamId, User, UserId};

pub const SECRET: &str = "integration-secret";

/// Memory store that records how many lookups it served.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    user_lookups: AtomicUsize,
    team_lookups: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingStore {
    /// Store with user 1 (team 10), user 2 (no team) and team 10.
    pub fn seeded() -> Arc<Self> {
        let store = Self::default();
        store.inner.insert_user(User {
            uid: 1,
            email: "alice@example.com".into(),
            nick: "alice".into(),
            admin: false,
            team_tid: Some(10),
        });
        store.inner.insert_user(User {
            uid: 2,
            email: "bob@example.com".into(),
            nick: "bob".into(),
            admin: true,
            team_tid: None,
        });
        store.inner.insert_team(Team {
            tid: 10,
            name: "hackers".into(),
        });
        Arc::new(store)
    }

    pub fn user_lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }

    pub fn team_lookups(&self) -> usize {
        self.team_lookups.load(Ordering::SeqCst)
    }

    pub fn stored_nick(&self, uid: UserId) -> Option<String> {
        self.inner.find_user(uid).ok().flatten().map(|u| u.nick)
    }

    pub fn reset(&self) {
        self.user_lookups.store(0, Ordering::SeqCst);
        self.team_lookups.store(0, Ordering::SeqCst);
    }
}

impl IdentityStore for RecordingStore {
    fn find_user(&self, uid: UserId) -> Result<Option<User>, StoreError> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_user(uid)
    }

    fn find_team(&self, tid: TeamId) -> Result<Option<Team>, StoreError> {
        self.team_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_team(tid)
    }

    fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner.save_user(user)
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        self.inner.save_team(team)
    }
}

pub fn test_config() -> GateConfig {
    let mut config = GateConfig::default();
    config.session.secret_key = SECRET.into();
    config
}

/// Send a request, optionally with a session cookie and JSON body.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// The `name=value` part of the response's session cookie, if one was set.
#[allow(dead_code)]
pub fn session_cookie(res: &Response<Body>) -> Option<String> {
    res.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

#[allow(dead_code)]
pub async fn json_body(res: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
