//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Error type for the catalog routes
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed path or query parameter
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Integrity failure or other server-side fault, with the message shown
    /// to the client
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Error type for the account routes
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::InvalidInput(_) | AuthError::UsernameTaken => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
