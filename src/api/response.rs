//! Response types for the colillas API.
//!
//! This module defines the success bodies, the error body shared by every
//! endpoint, and the mapping from pipeline outcomes to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::models::SessionIdentity;

/// Body of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always `true`; failures answer with an [`ApiError`] instead.
    pub success: bool,
    /// The backend user id, to send back on later requests.
    pub uid: i64,
    /// The login that was authenticated.
    pub username: String,
}

impl LoginResponse {
    /// Builds the body for an authenticated identity.
    pub fn from_identity(identity: &SessionIdentity) -> Self {
        Self {
            success: true,
            uid: identity.uid,
            username: identity.username.clone().unwrap_or_default(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
}

impl HealthResponse {
    /// The health body for this build.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

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
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PipelineError> for ApiErrorResponse {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::Unauthorized { message } => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("UNAUTHORIZED", message),
            },
            PipelineError::NothingToRender { batch_id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "NOTHING_TO_RENDER",
                    PipelineError::NothingToRender { batch_id }.to_string(),
                ),
            },
            PipelineError::CannotRender { message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("CANNOT_RENDER", message),
            },
            PipelineError::Internal { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("INTERNAL_ERROR", "Error processing the PDF", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_pipeline_errors_map_to_statuses() {
        let cases = [
            (
                PipelineError::Unauthorized {
                    message: "Invalid credentials".to_string(),
                },
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
            ),
            (
                PipelineError::NothingToRender { batch_id: 3 },
                StatusCode::NOT_FOUND,
                "NOTHING_TO_RENDER",
            ),
            (
                PipelineError::CannotRender {
                    message: "No reports registered for hr.payslip".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "CANNOT_RENDER",
            ),
            (
                PipelineError::Internal {
                    message: "truncated".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (error, status, code) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
            assert_eq!(response.error.code, code);
        }
    }

    #[test]
    fn test_internal_error_keeps_cause_in_details() {
        let response: ApiErrorResponse = PipelineError::Internal {
            message: "connection reset".to_string(),
        }
        .into();
        assert_eq!(response.error.details.as_deref(), Some("connection reset"));
    }

    #[test]
    fn test_login_response_shape() {
        let identity = SessionIdentity::new(6, "pw").with_username("nomina");
        let body = serde_json::to_value(LoginResponse::from_identity(&identity)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": true, "uid": 6, "username": "nomina"})
        );
    }

    #[test]
    fn test_health_reports_version() {
        let health = HealthResponse::ok();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }
}
