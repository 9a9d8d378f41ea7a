//! Auth handlers: login and current user.

use axum::Json;
use axum::extract::State;

use licensehub_core::types::response::ApiEnvelope;
use licensehub_service::user::LoginResult;

use super::ApiResult;
use crate::dto::request::LoginRequest;
use crate::dto::response::UserInfo;
use crate::extractors::{AuthUser, ClientInfo, ValidJson};
use crate::state::AppState;

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<LoginResult> {
    let result = state
        .login
        .login(&req.username, &req.password, &client.ip, &client.terminal)
        .await?;
    Ok(Json(ApiEnvelope::ok(result)))
}

/// GET /user/info
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<UserInfo> {
    let user = state.users.current(auth.context()).await?;
    Ok(Json(ApiEnvelope::ok(UserInfo::from(user))))
}
