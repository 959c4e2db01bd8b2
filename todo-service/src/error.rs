//! Error types and HTTP response conversion
//!
//! Every handler error funnels through `IntoResponse for Error`. The body sent
//! to the client never contains internal detail for 5xx responses; that
//! detail travels in an [`ErrorReport`] response extension which the
//! error-reporting middleware logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::RepositoryError;
use crate::responses::ValidationError;

/// Message sent for every 5xx response
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage failure other than absence
    ///
    /// Absence converts to [`Error::NotFound`] instead.
    #[error("{0}")]
    Repository(RepositoryError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input failed validation (400 with field details)
    #[error("{0}")]
    Validation(ValidationError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// The shared "Todo not found" error
    pub fn todo_not_found() -> Self {
        Error::NotFound("Todo not found".to_string())
    }

    /// HTTP status this error renders with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code sent in the response body
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => "CONFIG_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Io(_) | Error::Repository(_) | Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Error code
    pub code: String,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            status: status.as_u16(),
        }
    }

    /// The generic 500 body
    pub fn internal() -> Self {
        Self::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            INTERNAL_ERROR_MESSAGE,
        )
    }
}

/// Internal detail of a failed request, carried as a response extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Status the client received
    pub status: StatusCode,
    /// Code the client received
    pub code: &'static str,
    /// Full internal description, never sent to the client
    pub detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let report = ErrorReport {
            status: self.status_code(),
            code: self.code(),
            detail: self.to_string(),
        };

        let mut response = match self {
            Error::Validation(errors) => errors.into_response(),

            Error::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_code(StatusCode::NOT_FOUND, "NOT_FOUND", msg)),
            )
                .into_response(),

            Error::Config(_) | Error::InvalidConfig(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_code(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    INTERNAL_ERROR_MESSAGE,
                )),
            )
                .into_response(),

            Error::Io(_) | Error::Repository(_) | Error::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal()),
            )
                .into_response(),
        };

        response.extensions_mut().insert(report);
        response
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        if err.is_not_found() {
            Error::NotFound(err.message)
        } else {
            Error::Repository(err)
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}
