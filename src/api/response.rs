//! Response types for the Attendance Reconciliation Engine API.
//!
//! This module defines the success and error response structures for the
//! HTTP API. An ambiguity escalation is a successful response carrying the
//! confused record, never an error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{ConfusedShiftRecord, DailyAttendanceAggregate};

/// Response body for processing and resolution endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// The recomputed daily aggregate.
    pub aggregate: DailyAttendanceAggregate,
    /// The confused-shift record tied to the unit, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confused: Option<ConfusedShiftRecord>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// True when the caller may retry the request.
    #[serde(default)]
    pub retryable: bool,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    /// The HTTP status to respond with.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl From<EngineError> for ApiErrorResponse {
    fn from(err: EngineError) -> Self {
        let retryable = err.is_retryable();
        let (status, code) = match &err {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::SourceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "SOURCE_UNAVAILABLE")
            }
            EngineError::ShiftNotFound { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "SHIFT_NOT_FOUND")
            }
            EngineError::ReviewNotFound { .. } => (StatusCode::NOT_FOUND, "REVIEW_NOT_FOUND"),
            EngineError::InvalidReviewState { .. } => (StatusCode::CONFLICT, "INVALID_REVIEW_STATE"),
            EngineError::PunchHistoryMissing { .. } => {
                (StatusCode::NOT_FOUND, "PUNCH_HISTORY_MISSING")
            }
        };
        Self {
            status,
            error: ApiError {
                code: code.to_string(),
                message: err.to_string(),
                retryable,
            },
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_source_unavailable_maps_to_503_retryable() {
        let response: ApiErrorResponse = EngineError::SourceUnavailable {
            source: "shift catalog".to_string(),
            message: "timeout".to_string(),
        }
        .into();

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.error.code, "SOURCE_UNAVAILABLE");
        assert!(response.error.retryable);
    }

    #[test]
    fn test_invalid_review_state_maps_to_409() {
        let response: ApiErrorResponse = EngineError::InvalidReviewState {
            id: Uuid::nil(),
            status: "resolved".to_string(),
        }
        .into();

        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "INVALID_REVIEW_STATE");
        assert!(!response.error.retryable);
    }

    #[test]
    fn test_review_not_found_maps_to_404() {
        let response: ApiErrorResponse = EngineError::ReviewNotFound { id: Uuid::nil() }.into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
