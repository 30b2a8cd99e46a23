// ABOUTME: Unified error type with stable error codes for the GOYA server
// ABOUTME: Maps domain failures to HTTP status codes and hides internal details from clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

//! # Error handling
//!
//! Every fallible operation in the server returns [`AppResult`]. An [`AppError`]
//! carries a stable [`ErrorCode`] that clients can match on, plus a human-readable
//! message. Server-side codes (database, internal, configuration) never expose
//! their message over HTTP; the full text is logged instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error kinds exposed to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request payload failed validation
    InvalidInput,
    /// A required field was absent or empty
    MissingRequiredField,
    /// A value could not be parsed (dates, identifiers, enums)
    InvalidFormat,
    /// Referenced entity does not exist
    ResourceNotFound,
    /// Entity already exists or is still referenced
    ResourceConflict,
    /// Student already holds an enrollment for the selected cohort
    AlreadyEnrolled,
    /// Selected cohort has no free seats
    CohortFull,
    /// Mentor already supervises the maximum number of students
    MentorAtCapacity,
    /// Datastore failure
    DatabaseError,
    /// Unexpected server-side failure
    InternalError,
    /// Downstream collaborator (mail relay) failed
    ExternalServiceError,
    /// Invalid server configuration
    ConfigError,
}

impl ErrorCode {
    /// HTTP status code for this error kind
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::MentorAtCapacity => 400,
            Self::ResourceNotFound => 404,
            Self::ResourceConflict | Self::AlreadyEnrolled | Self::CohortFull => 409,
            Self::ExternalServiceError => 502,
            Self::DatabaseError | Self::InternalError | Self::ConfigError => 500,
        }
    }

    /// Wire representation of the code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::ResourceConflict => "RESOURCE_CONFLICT",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::CohortFull => "COHORT_FULL",
            Self::MentorAtCapacity => "MENTOR_AT_CAPACITY",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Generic client-facing description, used when the real message must stay private
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The request is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::InvalidFormat => "A field has an invalid format",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceConflict => "The resource conflicts with existing data",
            Self::AlreadyEnrolled => "Student is already enrolled in this cohort",
            Self::CohortFull => "Cohort is full",
            Self::MentorAtCapacity => "Mentor is at capacity",
            Self::DatabaseError | Self::InternalError | Self::ConfigError => {
                "Internal server error"
            }
            Self::ExternalServiceError => "An upstream service failed",
        }
    }

    /// Whether the failure originates on the server side
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error with a stable code and a descriptive message
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Stable error kind
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
}

/// Result alias used across the workspace
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an error with an explicit code
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Referenced entity does not exist
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Validation failure
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field missing
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
    }

    /// Duplicate or still-referenced entity
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceConflict, message)
    }

    /// Datastore failure
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unexpected internal failure
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Downstream collaborator failure
    #[must_use]
    pub fn external_service(service: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{service}: {}", message.into()),
        )
    }

    /// Invalid configuration
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Message that is safe to show to API clients
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.code.is_server_error() {
            self.code.description().to_owned()
        } else {
            self.message.clone()
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {error}"))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::not_found("Row not found"),
            other => Self::database(other.to_string()),
        }
    }
}

/// JSON error envelope returned by the HTTP layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorBody,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code
    pub code: ErrorCode,
    /// Client-safe message
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: ErrorBody {
                code: error.code,
                message: error.client_message(),
            },
        }
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use axum::{
        extract::rejection::{JsonRejection, QueryRejection},
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };

    use super::{AppError, ErrorResponse};

    /// Unreadable or mistyped request bodies are client input errors
    impl From<JsonRejection> for AppError {
        fn from(rejection: JsonRejection) -> Self {
            Self::invalid_input(rejection.body_text())
        }
    }

    impl From<QueryRejection> for AppError {
        fn from(rejection: QueryRejection) -> Self {
            Self::invalid_input(rejection.body_text())
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.code.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            if self.code.is_server_error() {
                tracing::error!(code = %self.code, message = %self.message, "request failed");
            } else {
                tracing::debug!(code = %self.code, message = %self.message, "request rejected");
            }

            (status, Json(ErrorResponse::from(&self))).into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_are_distinguishable() {
        let full = AppError::new(ErrorCode::CohortFull, "Cohort is full");
        let duplicate = AppError::new(ErrorCode::AlreadyEnrolled, "already enrolled");

        assert_eq!(full.code.http_status(), 409);
        assert_eq!(duplicate.code.http_status(), 409);
        assert_ne!(full.code.as_str(), duplicate.code.as_str());
    }

    #[test]
    fn mentor_capacity_is_a_client_error() {
        assert_eq!(ErrorCode::MentorAtCapacity.http_status(), 400);
        assert!(!ErrorCode::MentorAtCapacity.is_server_error());
    }

    #[test]
    fn server_errors_hide_their_message() {
        let error = AppError::database("no such table: cohorts (connection 3)");
        assert_eq!(error.client_message(), "Internal server error");

        let error = AppError::not_found("Student not found");
        assert_eq!(error.client_message(), "Student not found");
    }

    #[test]
    fn error_code_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::AlreadyEnrolled).unwrap();
        assert_eq!(json, "\"ALREADY_ENROLLED\"");
    }
}
