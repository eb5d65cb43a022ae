//! # REST API Errors
//!
//! Error types for the employee endpoints and their HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::Logger;
use crate::storage::StorageError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Error)]
pub enum RestError {
    // ==================
    // Validation (400)
    // ==================
    /// Request body is not a valid employee
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Path identifier is not a well-formed storage key
    #[error("Invalid employee id: {0}")]
    InvalidId(String),

    // ==================
    // Not found
    // ==================
    /// Update matched no record (400)
    #[error("No employee matches id {0}")]
    UpdateTargetMissing(String),

    /// Delete removed no record (404)
    #[error("Employee not found: {0}")]
    NotFound(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Any other storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidId(_) => StatusCode::BAD_REQUEST,
            RestError::UpdateTargetMissing(_) => StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&RestError> for ErrorResponse {
    fn from(err: &RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let RestError::Storage(source) = &self {
            Logger::error(
                "REST_STORAGE_FAILURE",
                &[("code", source.code()), ("message", &source.to_string())],
            );
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::InvalidBody("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::InvalidId("abc".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::UpdateTargetMissing("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::NotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_storage_error_is_500() {
        let err = RestError::from(StorageError::Unavailable("lock poisoned".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_body() {
        let body = ErrorResponse::from(&RestError::NotFound("abc".to_string()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 404);
        assert_eq!(json["error"], "Employee not found: abc");
    }
}
