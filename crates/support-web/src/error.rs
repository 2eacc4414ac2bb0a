//! Error types for the support chat API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use database::{DatabaseError, ValidationError};

/// Errors surfaced to API callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session.
    #[error("authentication required")]
    Unauthenticated,

    /// Login attempt with a wrong phone or password.
    #[error("invalid phone or password")]
    InvalidCredentials,

    /// Valid session lacking a required capability.
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Malformed request body or invariant violation.
    #[error("{0}")]
    Validation(String),

    /// Persistence failure.
    #[error("database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DatabaseError::AlreadyExists { .. } => ApiError::Validation(err.to_string()),
            DatabaseError::Validation(_) => ApiError::Validation(err.to_string()),
            other => ApiError::Database(other),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "ok": false,
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
