//! Error handling for the weather proxy
//!
//! Every failure a client can observe is an `AppError`. Cache failures never
//! appear here; the cache adapter absorbs them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ValidationError;
use thiserror::Error;

use crate::external::weather::UpstreamError;

/// Guidance returned for unknown routes
pub const NOT_FOUND_MESSAGE: &str =
    "Route not found. Use GET /weather?lat=<latitude>&lon=<longitude> or GET /health";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Client input
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Route not found")]
    NotFound,

    // Server configuration
    #[error("Weather API key is not configured")]
    CredentialMissing,

    // Upstream provider
    #[error("Weather provider did not respond in time")]
    UpstreamTimeout,

    #[error("Weather provider returned status {status}")]
    UpstreamHttp { status: u16, body: String },

    #[error("Weather provider unreachable: {0}")]
    UpstreamUnreachable(String),
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout => AppError::UpstreamTimeout,
            UpstreamError::Http { status, body } => AppError::UpstreamHttp { status, body },
            UpstreamError::Unreachable { message } => AppError::UpstreamUnreachable(message),
        }
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// HTTP status reported to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::CredentialMissing => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::UpstreamHttp { status, .. } => passthrough_status(*status),
            AppError::UpstreamUnreachable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> ErrorResponse {
        let (error, message, details) = match self {
            AppError::Validation(err) => ("Invalid coordinates", err.to_string(), None),
            AppError::NotFound => ("Not Found", NOT_FOUND_MESSAGE.to_string(), None),
            AppError::CredentialMissing => ("Configuration error", self.to_string(), None),
            AppError::UpstreamTimeout => ("Upstream timeout", self.to_string(), None),
            AppError::UpstreamHttp { body, .. } => {
                ("Upstream error", self.to_string(), Some(upstream_details(body)))
            }
            AppError::UpstreamUnreachable(msg) => ("Upstream unreachable", msg.clone(), None),
        };

        ErrorResponse {
            error: error.to_string(),
            message,
            details,
        }
    }
}

/// Upstream error statuses are passed through; anything else is a bad gateway
fn passthrough_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Embed the upstream payload as JSON when it is JSON, otherwise as text
fn upstream_details(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Error: {:?}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "Request rejected: {}", self);
        }

        (status, Json(self.error_response())).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
