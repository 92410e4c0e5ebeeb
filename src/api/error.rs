//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::scenario::EngineError;

/// Structured error response body for the front end.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),
    #[error("No assessment yet")]
    NoBaseline,
    #[error("Predictor unavailable: {0}")]
    PredictorUnavailable(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Service shutting down")]
    ShuttingDown,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(messages) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                messages.join(" "),
            ),
            ApiError::NoBaseline => (
                StatusCode::CONFLICT,
                "NO_BASELINE",
                "Submit an assessment before exploring scenarios".to_string(),
            ),
            ApiError::PredictorUnavailable(detail) => (
                StatusCode::BAD_GATEWAY,
                "PREDICTOR_UNAVAILABLE",
                detail.clone(),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::ShuttingDown => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SHUTTING_DOWN",
                "Service is shutting down".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::Validation(e.messages),
            CoreError::Predictor(e) => ApiError::PredictorUnavailable(e.to_string()),
            CoreError::Scenario(EngineError::NoBaseline) => ApiError::NoBaseline,
            CoreError::Scenario(EngineError::ShutDown) => ApiError::ShuttingDown,
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::History(e) => ApiError::Internal(e.to_string()),
            CoreError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}
