//! 核心错误种类到 HTTP 回应的统一映射。
//! 核心只产出错误值；状态码措辞是边界层的事。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub struct ApiError(domain::Error);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<domain::Error> for ApiError {
    fn from(e: domain::Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            domain::Error::NotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            domain::Error::Unauthorized | domain::Error::CredentialInvalid => {
                (StatusCode::UNAUTHORIZED, self.0.to_string())
            }
            domain::Error::Forbidden => (StatusCode::FORBIDDEN, self.0.to_string()),
            domain::Error::Conflict => (StatusCode::CONFLICT, self.0.to_string()),
            domain::Error::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            domain::Error::Storage(detail) => {
                tracing::error!(%detail, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
