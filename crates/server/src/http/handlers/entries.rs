use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use domain::BlogEntry;
use serde::Deserialize;
use serde_json::json;

use crate::http::error::ApiResult;
use crate::http::extract;
use crate::ops::{self, EntryDetails};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EntryPayload {
    pub title: String,
    pub content: String,
}

pub async fn create_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(blog_id): Path<i64>,
    Json(payload): Json<EntryPayload>,
) -> ApiResult<(StatusCode, Json<BlogEntry>)> {
    let principal = extract::current_principal(&headers, &state.resolver);
    let entry = ops::create_entry(
        &state.db,
        principal.as_ref(),
        blog_id,
        &payload.title,
        &payload.content,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn entry_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EntryDetails>> {
    Ok(Json(ops::entry_details(&state.db, id).await?))
}

pub async fn entry_by_slug(
    State(state): State<AppState>,
    Path((blog_id, slug)): Path<(i64, String)>,
) -> ApiResult<Json<EntryDetails>> {
    Ok(Json(ops::entry_by_slug(&state.db, blog_id, &slug).await?))
}

pub async fn update_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<EntryPayload>,
) -> ApiResult<Json<BlogEntry>> {
    let principal = extract::current_principal(&headers, &state.resolver);
    let entry = ops::update_entry(
        &state.db,
        principal.as_ref(),
        id,
        &payload.title,
        &payload.content,
    )
    .await?;
    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let principal = extract::current_principal(&headers, &state.resolver);
    ops::delete_entry(&state.db, principal.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let principal = extract::current_principal(&headers, &state.resolver);
    let enabled = ops::toggle_comments(&state.db, principal.as_ref(), id).await?;
    Ok(Json(json!({ "comments_enabled": enabled })))
}
