//! Error types for the PELAGOS API boundary.
//!
//! The boundary layer is one of the two places (with the ingestor) where
//! internal typed errors become transport-safe results. Grid requests
//! degrade to an explicit error envelope rather than a partial grid; only
//! genuinely broken requests surface as HTTP error statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pelagos_core::{PelagosError, PredictionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request contains invalid input data
    InvalidInput,

    /// Field value is out of valid range
    InvalidRange,

    /// Telemetry payload failed validation
    ValidationFailed,

    /// Every predictor in the fallback chain failed
    PredictionUnavailable,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Map the error code to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput | ErrorCode::InvalidRange => StatusCode::BAD_REQUEST,
            ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::PredictionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (field errors, attempt logs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create an InvalidRange error.
    pub fn invalid_range(field: &str, min: i64, max: i64) -> Self {
        Self::new(
            ErrorCode::InvalidRange,
            format!("{field} must be within [{min}, {max}]"),
        )
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<PelagosError> for ApiError {
    fn from(err: PelagosError) -> Self {
        match err {
            PelagosError::Validation(validation) => Self::new(
                ErrorCode::ValidationFailed,
                format!("{validation}"),
            )
            .with_details(serde_json::json!({ "field_errors": validation.failures })),
            PelagosError::Prediction(PredictionError::Unavailable { attempts }) => Self::new(
                ErrorCode::PredictionUnavailable,
                "All predictors failed",
            )
            .with_details(serde_json::json!({ "attempts": attempts })),
            other => Self::internal_error(format!("{other}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        (status, Json(self)).into_response()
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pelagos_core::ValidationError;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(
            ErrorCode::InvalidInput.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ValidationFailed.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::PredictionUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_error_carries_field_details() {
        let err: ApiError =
            PelagosError::from(ValidationError::single("latitude", "out of range")).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert!(details["field_errors"][0]["field"]
            .as_str()
            .unwrap()
            .contains("latitude"));
    }

    #[test]
    fn test_invalid_range_message() {
        let err = ApiError::invalid_range("grid_n", 1, 200);
        assert!(err.message.contains("grid_n"));
        assert!(err.message.contains("[1, 200]"));
    }
}
