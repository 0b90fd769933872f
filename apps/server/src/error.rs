//! API error type and the single core-error → HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use moneta_core::errors::{DatabaseError, Error as CoreError};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors a handler can return, already shaped for HTTP.
#[derive(Debug)]
pub enum ApiError {
    /// Validation failures and business-rule violations.
    BadRequest(String),
    /// Missing/invalid/expired bearer token.
    Unauthorized(String),
    /// Absent entity or one owned by another user; the message never says
    /// which.
    NotFound(String),
    /// Everything else (store, cache, mail, generative API).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Internal(detail) => {
                tracing::error!("request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server error", "error": detail })),
                )
                    .into_response()
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Database(DatabaseError::NotFound(message)) => ApiError::NotFound(message),
            CoreError::Database(DatabaseError::UniqueViolation(_)) => {
                ApiError::BadRequest("Already exists.".to_string())
            }
            CoreError::Validation(e) => ApiError::BadRequest(e.to_string()),
            CoreError::Business(message) => ApiError::BadRequest(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
