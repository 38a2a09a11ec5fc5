use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::infrastructure::storage::StorageError;

/// Application error types that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Validation failed: {errors:?}")]
    Validation { errors: BTreeMap<String, String> },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Payload too large: {message}")]
    PayloadTooLarge { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl AppError {
    /// Build a validation error for a single field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation { errors: BTreeMap::from([(field.to_string(), message.into())]) }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database { .. } | AppError::Storage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Authentication { .. } => "authentication",
            AppError::Validation { .. } => "validation",
            AppError::BadRequest { .. } => "bad_request",
            AppError::PayloadTooLarge { .. } => "payload_too_large",
            AppError::Database { .. } => "database",
            AppError::Storage { .. } => "storage",
        }
    }

    /// Dependency failures are logged as errors, client mistakes as warnings
    pub fn should_log_as_error(&self) -> bool {
        matches!(self, AppError::Database { .. } | AppError::Storage { .. })
    }

    /// Message safe to return to the caller
    ///
    /// Dependency errors carry driver and SDK detail that stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database { .. } | AppError::Storage { .. } => {
                "Internal server error".to_string()
            }
            AppError::Authentication { message }
            | AppError::BadRequest { message }
            | AppError::PayloadTooLarge { message } => message.clone(),
            AppError::Validation { .. } => "Request validation failed".to_string(),
        }
    }

    /// Create error response with proper structure
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                id: Uuid::new_v4().to_string(),
                error_type: self.error_type().to_string(),
                message: self.public_message(),
                details: self.get_details(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    fn get_details(&self) -> Option<Value> {
        match self {
            AppError::Validation { errors } => Some(json!({ "validation_errors": errors })),
            _ => None,
        }
    }
}

/// Structured error response
#[derive(serde::Serialize, Debug)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(serde::Serialize, Debug)]
pub struct ErrorDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();

        if self.should_log_as_error() {
            error!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application error: {}",
                self
            );
        } else {
            warn!(
                error_type = self.error_type(),
                error_id = error_response.error.id,
                "Application warning: {}",
                self
            );
        }

        (status, Json(error_response)).into_response()
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database { message: err.to_string() }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage { message: err.to_string() }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge { message: rejection.body_text() }
        } else {
            AppError::BadRequest { message: rejection.body_text() }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest { message: format!("Invalid JSON: {err}") }
    }
}
