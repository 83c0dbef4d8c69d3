// ABOUTME: Unified error handling system for the coupon service
// ABOUTME: Defines error codes, the AppError type, and HTTP response formatting
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Centralized error handling
//!
//! Every domain condition (validation failure, missing record, duplicate
//! code, stale concurrency token, double redemption) maps to a typed error
//! code here. Store failures that are not expected domain conditions collapse
//! to `DatabaseError`/`InternalError` and are reported to clients as opaque
//! failures. HTTP status mapping happens only at the response boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::validation::Violation;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "VALIDATION_FAILED")]
    ValidationFailed = 3001,
    #[serde(rename = "ALREADY_REDEEMED")]
    AlreadyRedeemed = 3002,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "DUPLICATE_CODE")]
    DuplicateCode = 4001,
    #[serde(rename = "STALE_TOKEN")]
    StaleToken = 4002,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::ValidationFailed | Self::AlreadyRedeemed => {
                StatusCode::BAD_REQUEST
            }

            // 404 Not Found
            Self::ResourceNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::DuplicateCode | Self::StaleToken => StatusCode::CONFLICT,

            // 500 Internal Server Error
            Self::ConfigError | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-facing description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ValidationFailed => "The request payload failed validation",
            Self::AlreadyRedeemed => "The coupon has already been redeemed",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::DuplicateCode => "A coupon with this code already exists",
            Self::StaleToken => "The record was modified by another request",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Document store operation failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional structured detail reported to the caller
    pub details: serde_json::Value,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
            source: None,
        }
    }

    /// Attach structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Invalid input, e.g. a malformed record identifier
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Schema validation failure carrying the full violation list
    #[must_use]
    pub fn validation(violations: Vec<Violation>) -> Self {
        let count = violations.len();
        Self::new(
            ErrorCode::ValidationFailed,
            format!("payload failed validation with {count} violation(s)"),
        )
        .with_details(serde_json::json!({ "errors": violations }))
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Duplicate client-supplied coupon code
    #[must_use]
    pub fn duplicate_code(code: i64) -> Self {
        Self::new(
            ErrorCode::DuplicateCode,
            format!("coupon code {code} already exists"),
        )
    }

    /// Stale optimistic-concurrency token on update
    #[must_use]
    pub fn stale_token() -> Self {
        Self::new(
            ErrorCode::StaleToken,
            "updatedAt does not match the current record",
        )
    }

    /// Redemption attempted on an already-redeemed coupon
    pub fn already_redeemed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyRedeemed, message)
    }

    /// Document store failure; details stay server-side
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();

        if status.is_server_error() {
            // Log the cause server-side; the client gets an opaque message.
            tracing::error!(
                code = ?self.code,
                source = ?self.source,
                "request failed: {}",
                self.message
            );
            let body = ErrorResponse {
                error: ErrorResponseDetails {
                    code: self.code,
                    message: self.code.description().to_owned(),
                    details: serde_json::Value::Null,
                },
            };
            return (status, Json(body)).into_response();
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::DatabaseError, error.to_string())
    }
}
