use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use domain::Blog;
use serde::Deserialize;

use crate::http::error::ApiResult;
use crate::http::extract;
use crate::ops::{self, BlogDetails};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BlogPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

pub async fn my_blogs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Blog>>> {
    let principal = extract::current_principal(&headers, &state.resolver);
    let blogs = ops::my_blogs(&state.db, principal.as_ref()).await?;
    Ok(Json(blogs))
}

pub async fn create_blog(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<BlogPayload>,
) -> ApiResult<(StatusCode, Json<Blog>)> {
    let principal = extract::current_principal(&headers, &state.resolver);
    let blog = ops::create_blog(
        &state.db,
        principal.as_ref(),
        &payload.title,
        &payload.description,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

pub async fn blog_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BlogDetails>> {
    Ok(Json(ops::blog_details(&state.db, id).await?))
}

pub async fn update_blog(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<BlogPayload>,
) -> ApiResult<Json<Blog>> {
    let principal = extract::current_principal(&headers, &state.resolver);
    let blog = ops::update_blog(
        &state.db,
        principal.as_ref(),
        id,
        &payload.title,
        &payload.description,
    )
    .await?;
    Ok(Json(blog))
}

pub async fn delete_blog(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let principal = extract::current_principal(&headers, &state.resolver);
    ops::delete_blog(&state.db, principal.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
