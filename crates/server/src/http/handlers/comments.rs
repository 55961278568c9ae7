use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use domain::{Comment, CommentNode};
use serde::Deserialize;

use crate::http::error::ApiResult;
use crate::http::extract;
use crate::ops::{self, NewComment};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(default)]
    pub parent_comment_id: Option<i64>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub guest_email: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> ApiResult<Json<Vec<CommentNode>>> {
    Ok(Json(ops::list_comments(&state.db, entry_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entry_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let principal = extract::current_principal(&headers, &state.resolver);
    let comment = ops::create_comment(
        &state.db,
        principal.as_ref(),
        entry_id,
        NewComment {
            parent_comment_id: payload.parent_comment_id,
            content: payload.content,
            guest_name: payload.guest_name,
            guest_email: payload.guest_email,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    let principal = extract::current_principal(&headers, &state.resolver);
    let comment =
        ops::update_comment(&state.db, principal.as_ref(), id, &payload.content).await?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let principal = extract::current_principal(&headers, &state.resolver);
    ops::delete_comment(&state.db, principal.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
