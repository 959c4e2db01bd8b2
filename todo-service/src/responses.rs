//! HTTP response builders with correct status codes
//!
//! - **201 Created** - [`Created`], with an optional `Location` header
//! - **200 OK** - [`Acknowledgement`], the `{"ok": true}` body returned by
//!   deletes and the health check
//! - **400 Bad Request** - [`ValidationError`], with field-level details
//!
//! ## Example Usage
//!
//! ```rust
//! use axum::{http::StatusCode, response::IntoResponse};
//! use todo_service::responses::{Created, ValidationError};
//!
//! let response = Created::new(serde_json::json!({"id": 1}))
//!     .with_location("/todos/1")
//!     .into_response();
//! assert_eq!(response.status(), StatusCode::CREATED);
//!
//! let mut errors = ValidationError::new("Validation failed");
//! errors.add_field_error("title", "REQUIRED", "Title is required");
//! assert_eq!(errors.into_response().status(), StatusCode::BAD_REQUEST);
//! ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Key under which errors that belong to the request as a whole are filed
pub const FORM_ERROR_KEY: &str = "_request";

// ============================================================================
// 201 Created
// ============================================================================

/// HTTP 201 Created response
///
/// Used when a new resource has been successfully created (POST).
/// Optionally includes a `Location` header pointing to the new resource.
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    location: Option<String>,
}

impl<T> Created<T> {
    /// Create a new 201 Created response
    pub fn new(data: T) -> Self {
        Self {
            data,
            location: None,
        }
    }

    /// Add a Location header pointing to the created resource
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.data)).into_response();

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}

// ============================================================================
// 200 Acknowledgement
// ============================================================================

/// `{"ok": true}` body for operations with nothing else to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Always `true`
    pub ok: bool,
}

impl Acknowledgement {
    /// The one acknowledgement value
    pub const fn ok() -> Self {
        Self { ok: true }
    }
}

impl Default for Acknowledgement {
    fn default() -> Self {
        Self::ok()
    }
}

impl IntoResponse for Acknowledgement {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// ============================================================================
// 400 Bad Request (Validation Errors)
// ============================================================================

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error code (e.g., "REQUIRED", "INVALID_TYPE", "TOO_LONG")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// HTTP 400 response for rejected input
///
/// Errors are grouped by field. Problems with the request as a whole
/// (malformed JSON, wrong content type) are filed under [`FORM_ERROR_KEY`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    error: String,
    code: String,
    status: u16,
    /// Field-level validation errors
    pub errors: HashMap<String, Vec<FieldError>>,
}

impl ValidationError {
    /// Create a new validation error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: "VALIDATION_ERROR".to_string(),
            status: StatusCode::BAD_REQUEST.as_u16(),
            errors: HashMap::new(),
        }
    }

    /// Single form-level error, used for bodies and queries that could not be decoded
    pub fn form(code: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::new("Validation failed");
        error.add_form_error(code, message);
        error
    }

    /// Add a field-level error
    pub fn add_field_error(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        let field = field.into();
        let error = FieldError {
            field: field.clone(),
            code: code.into(),
            message: message.into(),
        };

        self.errors.entry(field).or_default().push(error);
    }

    /// Add an error that concerns the whole request
    pub fn add_form_error(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.add_field_error(FORM_ERROR_KEY, code, message);
    }

    /// Check if there are any validation errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of field errors
    pub fn error_count(&self) -> usize {
        self.errors.values().map(|v| v.len()).sum()
    }

    /// Errors recorded for one field
    pub fn field(&self, field: &str) -> &[FieldError] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        let mut fields: Vec<_> = self.errors.keys().collect();
        fields.sort();
        for field in fields {
            for error in &self.errors[field] {
                write!(f, "; {}: {} ({})", field, error.message, error.code)?;
            }
        }
        Ok(())
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}
