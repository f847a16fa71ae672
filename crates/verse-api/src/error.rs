use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use verse_db::StoreError;

/// Request-level failure taxonomy. Every variant maps to one status code and
/// a `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input or a violated uniqueness constraint.
    #[error("{0}")]
    Validation(String),
    /// Wrong email/password pair on login.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Protected endpoint reached without a session cookie.
    #[error("Unauthorized")]
    Unauthorized,
    /// Session cookie present but its signature or payload is invalid.
    #[error("Forbidden")]
    Forbidden,
    /// Store or crypto fault. The cause is logged, never sent to the client.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            error!("request failed: {err:#}");
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ApiError::Internal(err.into())
    }
}
