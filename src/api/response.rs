//! Response types for the allocation API.
//!
//! This module defines the error response structures and the mapping from
//! engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        error: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(error: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", error)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(error: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", error)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let code = error.code();
        let message = error.to_string();
        let (status, details) = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some("The engine configuration could not be loaded".to_string()),
            ),
            EngineError::Configuration { .. } => (
                StatusCode::BAD_REQUEST,
                Some("Fix the company or branch setup and run the allocation again".to_string()),
            ),
            EngineError::InvalidEmployee { .. } => (
                StatusCode::BAD_REQUEST,
                Some("The employee data contains invalid information".to_string()),
            ),
            EngineError::NotFound { .. } => (StatusCode::NOT_FOUND, None),
            EngineError::DataUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                Some("No changes were made; retry later".to_string()),
            ),
            EngineError::PartialWrite { failures, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(format!(
                    "Re-running the allocation is safe. Failed writes: {}",
                    failures.join("; ")
                )),
            ),
        };

        ApiErrorResponse {
            status,
            error: ApiError {
                error: message,
                code: code.to_string(),
                details,
            },
        }
    }
}
