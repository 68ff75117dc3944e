//! End-to-end request lifecycle: session load, persist and response headers.

use axum::http::{header, StatusCode};
use serde_json::json;

use scoreboard_gate::config::CspTable;
use scoreboard_gate::http::build_router;
use scoreboard_gate::security::CspPolicy;
use scoreboard_gate::session::{Session, SessionCodec, TEAM_KEY, UID_KEY, USER_KEY};

mod common;

use common::{json_body, send, session_cookie, test_config, RecordingStore};

fn cookie_for(session: &Session) -> String {
    let codec = SessionCodec::from_config(&test_config().session);
    format!("session={}", codec.encode(session).unwrap())
}

fn assert_security_headers(res: &axum::http::Response<axum::body::Body>) {
    let headers = res.headers();
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::X_XSS_PROTECTION], "1; mode=block");
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
}

#[tokio::test]
async fn test_empty_session_is_anonymous() {
    let store = RecordingStore::seeded();
    let app = build_router(&test_config(), store.clone()).unwrap();

    let res = send(&app, "GET", "/api/session", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_security_headers(&res);
    assert!(session_cookie(&res).is_none());

    let body = json_body(res).await;
    assert!(body["user"].is_null());
    assert!(body["team"].is_null());
    assert_eq!(body["gametime"]["state"], "running");
    assert_eq!(store.user_lookups() + store.team_lookups(), 0);
}

#[tokio::test]
async fn test_default_csp_header() {
    let app = build_router(&test_config(), RecordingStore::seeded()).unwrap();
    let res = send(&app, "GET", "/health", None, None).await;

    let csp = res.headers()[header::CONTENT_SECURITY_POLICY].to_str().unwrap();
    assert_eq!(CspPolicy::parse(csp), CspPolicy::default());
}

#[tokio::test]
async fn test_extended_csp_header() {
    let mut config = test_config();
    let mut extend = CspTable::new();
    extend.insert("img-src".into(), vec!["example.com".into()]);
    config.security.extend_csp_policy = Some(extend);
    let app = build_router(&config, RecordingStore::seeded()).unwrap();

    let res = send(&app, "GET", "/health", None, None).await;
    let csp = res.headers()[header::CONTENT_SECURITY_POLICY].to_str().unwrap();
    let policy = CspPolicy::parse(csp);
    assert_eq!(
        policy.sources("img-src").unwrap(),
        ["'self'", "data:", "example.com"]
    );
}

#[tokio::test]
async fn test_raw_uid_session_does_one_user_lookup() {
    let store = RecordingStore::seeded();
    let app = build_router(&test_config(), store.clone()).unwrap();

    let mut session = Session::new();
    session.insert(UID_KEY, json!(2));
    let res = send(&app, "GET", "/api/session", Some(&cookie_for(&session)), None).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(store.user_lookups(), 1);
    assert_eq!(store.team_lookups(), 0);

    let body = json_body(res).await;
    assert_eq!(body["user"]["nick"], "bob");
    assert_eq!(body["user"]["admin"], true);
    assert!(body["team"].is_null());
}

#[tokio::test]
async fn test_login_then_snapshot_reuse() {
    let store = RecordingStore::seeded();
    let app = build_router(&test_config(), store.clone()).unwrap();

    // Login records the raw keys only.
    let res = send(&app, "POST", "/api/login", None, Some(json!({"uid": 1}))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("login sets the session cookie");

    // First request after login resolves user and team by key, then
    // persists both snapshots.
    store.reset();
    let res = send(&app, "GET", "/api/session", Some(&cookie), None).await;
    assert_eq!(store.user_lookups(), 1);
    assert_eq!(store.team_lookups(), 1);
    let cookie = session_cookie(&res).expect("snapshots are written back");
    let body = json_body(res).await;
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["team"]["name"], "hackers");

    // From now on the snapshots answer without the store.
    store.reset();
    let res = send(&app, "GET", "/api/session", Some(&cookie), None).await;
    assert!(session_cookie(&res).is_none());
    let body = json_body(res).await;
    assert_eq!(body["user"]["nick"], "alice");
    assert_eq!(store.user_lookups() + store.team_lookups(), 0);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = build_router(&test_config(), RecordingStore::seeded()).unwrap();
    let res = send(&app, "POST", "/api/login", None, Some(json!({"uid": 404}))).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_security_headers(&res);
    assert!(session_cookie(&res).is_none());
}

#[tokio::test]
async fn test_nick_update_writes_through() {
    let store = RecordingStore::seeded();
    let app = build_router(&test_config(), store.clone()).unwrap();

    let mut session = Session::new();
    session.insert(USER_KEY, json!({"uid": 1, "nick": "alice"}));
    session.insert(TEAM_KEY, json!({"tid": 10, "name": "hackers"}));
    let res = send(
        &app,
        "PUT",
        "/api/me/nick",
        Some(&cookie_for(&session)),
        Some(json!({"nick": "al1ce"})),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(store.user_lookups(), 1);
    let cookie = session_cookie(&res).expect("snapshot changed");
    assert_eq!(json_body(res).await["nick"], "al1ce");
    assert_eq!(store.stored_nick(1).as_deref(), Some("al1ce"));

    store.reset();
    let res = send(&app, "GET", "/api/session", Some(&cookie), None).await;
    assert_eq!(json_body(res).await["user"]["nick"], "al1ce");
    assert_eq!(store.user_lookups(), 0);
}

#[tokio::test]
async fn test_nick_update_requires_login() {
    let app = build_router(&test_config(), RecordingStore::seeded()).unwrap();
    let res = send(&app, "PUT", "/api/me/nick", None, Some(json!({"nick": "x"}))).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_security_headers(&res);
}

#[tokio::test]
async fn test_deleted_user_snapshot_fails_on_resolve() {
    let store = RecordingStore::seeded();
    store.inner.remove_user(1);
    let app = build_router(&test_config(), store.clone()).unwrap();

    let mut session = Session::new();
    session.insert(USER_KEY, json!({"uid": 1, "nick": "alice"}));
    session.insert(TEAM_KEY, json!({"tid": 10, "name": "hackers"}));
    let cookie = cookie_for(&session);

    // Snapshot reads still work.
    let res = send(&app, "GET", "/api/session", Some(&cookie), None).await;
    assert_eq!(json_body(res).await["user"]["nick"], "alice");

    let res = send(&app, "PUT", "/api/me/nick", Some(&cookie), Some(json!({"nick": "x"}))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_security_headers(&res);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = build_router(&test_config(), RecordingStore::seeded()).unwrap();
    let mut session = Session::new();
    session.insert(USER_KEY, json!({"uid": 1}));
    session.insert(TEAM_KEY, json!({"tid": 10}));

    let res = send(&app, "POST", "/api/logout", Some(&cookie_for(&session)), None).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_tampered_cookie_is_anonymous() {
    let store = RecordingStore::seeded();
    let app = build_router(&test_config(), store.clone()).unwrap();

    let mut session = Session::new();
    session.insert(UID_KEY, json!(1));
    let forged = {
        let other = SessionCodec::from_config(&scoreboard_gate::config::SessionConfig {
            secret_key: "attacker".into(),
            ..test_config().session
        });
        format!("session={}", other.encode(&session).unwrap())
    };

    let res = send(&app, "GET", "/api/session", Some(&forged), None).await;
    assert!(json_body(res).await["user"].is_null());
    assert_eq!(store.user_lookups(), 0);
}

#[tokio::test]
async fn test_query_counting_leaves_responses_alone() {
    let store = RecordingStore::seeded();
    let mut config = test_config();
    config.observability.count_queries = true;
    let app = build_router(&config, store.clone()).unwrap();

    let mut session = Session::new();
    session.insert(UID_KEY, json!(1));
    session.insert(TEAM_KEY, json!(10));
    let res = send(&app, "GET", "/api/session", Some(&cookie_for(&session)), None).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_security_headers(&res);
    assert_eq!(store.user_lookups(), 1);
    assert_eq!(json_body(res).await["team"]["tid"], 10);
}

#[tokio::test]
async fn test_oversized_cookie_keeps_security_headers() {
    let mut config = test_config();
    config.session.max_cookie_bytes = 16;
    let app = build_router(&config, RecordingStore::seeded()).unwrap();

    let res = send(&app, "POST", "/api/login", None, Some(json!({"uid": 1}))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(session_cookie(&res).is_none());
    assert_security_headers(&res);
}
