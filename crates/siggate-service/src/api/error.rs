//! API error types and responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use siggate_core::{CheckResult, CoreError};

use crate::error::ServiceError;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Integrity check failed: {0}")]
    Integrity(CheckResult),

    #[error("Unprocessable ciphertext: {0}")]
    Unprocessable(CoreError),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                None,
            ),
            ApiError::Integrity(result) => (
                StatusCode::FORBIDDEN,
                "INTEGRITY_ERROR",
                "Signer integrity not verified".to_string(),
                Some(serde_json::json!({
                    "status": result.status(),
                    "mismatch": result.mismatch(),
                    "legacy_code": result.legacy_code(),
                })),
            ),
            ApiError::Unprocessable(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                err.code(),
                err.to_string(),
                None,
            ),
            ApiError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "INPUT_TOO_LARGE",
                msg.clone(),
                None,
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Integrity(result) => ApiError::Integrity(result),
            CoreError::MalformedCipherText(msg) => {
                ApiError::BadRequest(format!("Malformed ciphertext: {}", msg))
            }
            CoreError::Authentication | CoreError::KeyMismatch(_) => ApiError::Unprocessable(err),
            CoreError::InputTooLarge { .. } => ApiError::PayloadTooLarge(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::EmptyInput(what) => {
                ApiError::BadRequest(format!("{} cannot be empty", what))
            }
            ServiceError::Core(err) => err.into(),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
