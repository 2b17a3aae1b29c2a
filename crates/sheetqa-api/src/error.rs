//! API error handling
//!
//! Author: hephaex@gmail.com

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sheetqa_core::SheetQaError;
use utoipa::ToSchema;

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message
    #[schema(example = "Missing question")]
    pub error: String,
}

/// Application error type
///
/// Each kind maps to exactly one status code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UpstreamFetch(String),

    #[error("{0}")]
    ModelInvocation(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamFetch(_) | AppError::ModelInvocation(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SheetQaError> for AppError {
    fn from(err: SheetQaError) -> Self {
        match err {
            SheetQaError::Validation(msg) => AppError::Validation(msg),
            err @ SheetQaError::UpstreamFetch(_) => AppError::UpstreamFetch(err.to_string()),
            err @ SheetQaError::ModelInvocation(_) => AppError::ModelInvocation(err.to_string()),
            err @ SheetQaError::Config(_) => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::Validation("Missing question".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UpstreamFetch("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ModelInvocation("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_error_mapping_keeps_message() {
        let err = AppError::from(SheetQaError::UpstreamFetch("invalid_grant".into()));
        assert!(matches!(err, AppError::UpstreamFetch(_)));
        assert_eq!(err.to_string(), "Sheet fetch failed: invalid_grant");

        let err = AppError::from(SheetQaError::Validation("Missing question".into()));
        assert_eq!(err.to_string(), "Missing question");

        let err = AppError::from(SheetQaError::Config("OpenAI API key required".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
