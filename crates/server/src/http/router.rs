use super::handlers::{auth, blogs, comments, entries};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods(methods.clone())
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
            CorsLayer::new()
                .allow_methods(methods.clone())
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods(methods.clone())
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/blogs", get(blogs::my_blogs).post(blogs::create_blog))
        .route(
            "/api/blogs/:id",
            get(blogs::blog_details)
                .put(blogs::update_blog)
                .delete(blogs::delete_blog),
        )
        .route("/api/blogs/:id/entries", post(entries::create_entry))
        .route("/api/blogs/:id/entries/:slug", get(entries::entry_by_slug))
        .route(
            "/api/entries/:id",
            get(entries::entry_details)
                .put(entries::update_entry)
                .delete(entries::delete_entry),
        )
        .route(
            "/api/entries/:id/comments-toggle",
            post(entries::toggle_comments),
        )
        .route(
            "/api/entries/:id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/comments/:id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .layer(cors)
        .with_state(state)
}
