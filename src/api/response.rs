//! Response types for the leave API.
//!
//! This module defines the success bodies, the error body, and the mapping
//! from engine errors to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::approval::ApprovalReport;
use crate::error::EngineError;
use crate::models::{Identity, LeaveRecord};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a not found error response.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 404 response.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::not_found(message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

fn dependency_failure(code: &str, message: &str, details: String) -> ApiErrorResponse {
    ApiErrorResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        error: ApiError::with_details(code, message, details),
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let details = error.to_string();
        match error {
            EngineError::InvalidRange { start, end } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_RANGE",
                    format!("Leave interval {} to {} is inverted", start, end),
                    "start_date must not be after end_date",
                ),
            ),
            EngineError::Validation { message } => {
                ApiErrorResponse::bad_request(ApiError::validation_error(message))
            }
            EngineError::Unauthorized { reason } => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("UNAUTHORIZED", reason),
            },
            EngineError::Unauthenticated => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::with_details(
                    "UNAUTHENTICATED",
                    "Authentication required",
                    "Log in and send the returned token in the Session-Id header",
                ),
            },
            EngineError::HolidayLookupFailure { .. } => {
                dependency_failure("HOLIDAY_LOOKUP_FAILED", "Holiday lookup failed", details)
            }
            EngineError::Storage { .. } => {
                dependency_failure("STORAGE_ERROR", "Storage operation failed", details)
            }
            EngineError::Directory { .. } => {
                dependency_failure("DIRECTORY_ERROR", "Directory lookup failed", details)
            }
            EngineError::Timeout { .. } => {
                dependency_failure("TIMEOUT", "External call timed out", details)
            }
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                dependency_failure("CONFIG_ERROR", "Configuration error", details)
            }
        }
    }
}

/// Response body for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Token to send in the `Session-Id` header.
    pub session_id: String,
    /// The authenticated identity.
    pub identity: Identity,
}

/// Response body for `POST /leaves/apply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResponse {
    /// Records created from the application.
    pub records: Vec<LeaveRecord>,
    /// Leave documents matched by the update.
    pub matched_count: u64,
    /// Leave documents changed by the update.
    pub modified_count: u64,
}

/// Response body for `POST /leaves/approve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveResponse {
    /// One report per submitted decision, in submission order.
    pub reports: Vec<ApprovalReport>,
}
