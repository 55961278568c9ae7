use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::error::ApiResult;
use crate::http::extract;
use crate::ops;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub login: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: domain::User,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (user, token) = ops::register(
        &state.db,
        &state.resolver,
        &payload.username,
        &payload.email,
        &payload.password,
    )
    .await?;
    Ok(Json(AuthResponse { token, user }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (user, token) =
        ops::login(&state.db, &state.resolver, &payload.login, &payload.password).await?;
    Ok(Json(AuthResponse { token, user }))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<&'static str> {
    if let Some(token) = extract::bearer_token(&headers) {
        ops::logout(&state.resolver, token);
    }
    Json("ok")
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<domain::Principal>> {
    let principal = extract::current_principal(&headers, &state.resolver)
        .ok_or(domain::Error::Unauthorized)?;
    Ok(Json(principal))
}
