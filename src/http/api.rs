//! JSON API over the request identity.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::context::RequestContext;
use crate::gametime::GameTimeView;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::session::{TEAM_KEY, UID_KEY, USER_KEY};
use crate::store::UserId;

const MAX_NICK_LEN: usize = 64;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: Option<Value>,
    pub team: Option<Value>,
    pub gametime: GameTimeView,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub uid: UserId,
}

#[derive(Debug, Deserialize)]
pub struct NickRequest {
    pub nick: String,
}

pub async fn health() -> &'static str {
    "ok"
}

/// Current identity snapshots plus the game clock.
pub async fn session_view(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Json<SessionView> {
    let identity = ctx.identity().await;
    Json(SessionView {
        user: identity
            .user
            .as_ref()
            .map(|u| Value::Object(u.to_json().clone())),
        team: identity
            .team
            .as_ref()
            .map(|t| Value::Object(t.to_json().clone())),
        gametime: state.game.view(),
    })
}

/// Record the raw user key; the next request resolves it.
pub async fn login(
    ctx: RequestContext,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = ctx
        .store()
        .find_user(body.uid)?
        .ok_or(ApiError::NotFound("User"))?;

    let mut session = ctx.session().await;
    session.clear();
    session.insert(UID_KEY, json!(user.uid));
    if let Some(tid) = user.team_tid {
        session.insert(TEAM_KEY, json!(tid));
    }
    ctx.identity().await.clear();

    tracing::info!(uid = user.uid, "User logged in");
    Ok(Json(json!({ "uid": user.uid, "nick": user.nick })))
}

pub async fn logout(ctx: RequestContext) -> StatusCode {
    ctx.session().await.clear();
    ctx.identity().await.clear();
    StatusCode::NO_CONTENT
}

/// Rename the current user, writing through the proxy.
pub async fn update_nick(
    ctx: RequestContext,
    Json(body): Json<NickRequest>,
) -> Result<Json<Value>, ApiError> {
    let nick = body.nick.trim();
    if nick.is_empty() || nick.chars().count() > MAX_NICK_LEN {
        return Err(ApiError::BadRequest(format!(
            "nick must be 1-{} characters",
            MAX_NICK_LEN
        )));
    }

    let mut session = ctx.session().await;
    let mut identity = ctx.identity().await;
    let user = identity.user.as_mut().ok_or(ApiError::Unauthorized)?;
    user.resolve()?;
    user.set_nick(nick)?;

    // Refresh a stored snapshot even if the persister skips this request.
    let snapshot = Value::Object(user.to_json().clone());
    if session.get(USER_KEY).is_some() {
        session.insert(USER_KEY, snapshot.clone());
    }
    Ok(Json(snapshot))
}
