//! Error handling for the shelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Fixed message returned for every internal failure.
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Body shape a route uses when it reports an internal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    /// `text/plain` body with [`INTERNAL_MESSAGE`]
    Text,
    /// `{"error": INTERNAL_MESSAGE}`
    Json,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("internal error: {cause}")]
    Internal {
        format: ErrorFormat,
        cause: anyhow::Error,
    },
}

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Internal failure reported as plain text
    pub fn internal_text<E>(source: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal {
            format: ErrorFormat::Text,
            cause: source.into(),
        }
    }

    /// Internal failure reported as JSON
    pub fn internal_json<E>(source: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal {
            format: ErrorFormat::Json,
            cause: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            AppError::NotFound { message } => {
                tracing::debug!(status_code = %status.as_u16(), %message, "resource not found");
                (status, Json(json!({ "error": message }))).into_response()
            }
            AppError::Internal { format, cause } => {
                let error_id = Uuid::new_v4();
                // Details stay in the log; callers only get the fixed message.
                tracing::error!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    error = ?cause,
                    "request failed"
                );

                match format {
                    ErrorFormat::Text => (status, INTERNAL_MESSAGE).into_response(),
                    ErrorFormat::Json => {
                        (status, Json(json!({ "error": INTERNAL_MESSAGE }))).into_response()
                    }
                }
            }
        }
    }
}
