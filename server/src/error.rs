//! Error types for the StudyGuard server.
//!
//! [`ApiError`] is what handlers return on failure. It renders as an HTTP
//! status plus the service's usual error body:
//!
//! ```json
//! { "status": "error", "error": "unknown task: Essay" }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by route handlers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request body is missing fields or has invalid values.
    #[error("validation error: {0}")]
    Validation(String),

    /// The named task does not exist.
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// Attention signals arrive while monitoring is off.
    #[error("monitoring is not active")]
    MonitoringInactive,
}

impl ApiError {
    /// Creates a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnknownTask(_) => StatusCode::NOT_FOUND,
            Self::MonitoringInactive => StatusCode::CONFLICT,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
