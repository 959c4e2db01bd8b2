//! Request input validation
//!
//! Query strings and JSON bodies are first decoded into loose shapes
//! (strings and raw JSON values) and then checked here, so that every
//! problem is reported as a field-level error instead of a decoding failure.
//!
//! ```rust
//! use todo_service::handlers::validation::ListParams;
//!
//! let params = ListParams {
//!     offset: Some(" 40 ".to_string()),
//!     limit: Some("2e1".to_string()),
//! };
//! let pagination = params.validate().unwrap();
//! assert_eq!((pagination.offset, pagination.limit), (40, 20));
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use serde::Deserialize;
use serde_json::Value;

use crate::models::Title;
use crate::pagination::{Pagination, DEFAULT_LIMIT, MAX_LIMIT};
use crate::responses::ValidationError;

/// Upper bound for floats accepted as integers; keeps the cast exact
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Raw `offset` / `limit` query values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    /// Number of items to skip
    pub offset: Option<String>,
    /// Page size
    pub limit: Option<String>,
}

impl ListParams {
    /// Coerce and range-check into [`Pagination`]
    ///
    /// Both fields are checked so the client sees every problem at once.
    pub fn validate(&self) -> Result<Pagination, ValidationError> {
        let mut errors = ValidationError::new("Invalid query parameters");

        let offset = match coerce_integer(self.offset.as_deref()) {
            Coerced::Absent => Some(0),
            Coerced::Integer(v) if v < 0 => {
                errors.add_field_error("offset", "TOO_SMALL", "offset must be at least 0");
                None
            }
            Coerced::Integer(v) => u64::try_from(v).ok().or_else(|| {
                errors.add_field_error("offset", "INVALID_INTEGER", "offset is out of range");
                None
            }),
            Coerced::Invalid => {
                errors.add_field_error("offset", "INVALID_INTEGER", "offset must be an integer");
                None
            }
        };

        let limit = match coerce_integer(self.limit.as_deref()) {
            Coerced::Absent => Some(DEFAULT_LIMIT),
            Coerced::Integer(v) if v < 1 => {
                errors.add_field_error("limit", "TOO_SMALL", "limit must be at least 1");
                None
            }
            Coerced::Integer(v) if v > i128::from(MAX_LIMIT) => {
                errors.add_field_error(
                    "limit",
                    "TOO_LARGE",
                    format!("limit must be at most {}", MAX_LIMIT),
                );
                None
            }
            Coerced::Integer(v) => u64::try_from(v).ok(),
            Coerced::Invalid => {
                errors.add_field_error("limit", "INVALID_INTEGER", "limit must be an integer");
                None
            }
        };

        match (offset, limit) {
            (Some(offset), Some(limit)) if !errors.has_errors() => {
                Ok(Pagination::new(offset, limit))
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coerced {
    Absent,
    Integer(i128),
    Invalid,
}

/// Lenient integer coercion for query values
///
/// Whitespace is ignored and a present but empty value reads as zero.
/// Integral numbers written with a fraction or an exponent are accepted,
/// as are unsigned `0x`, `0o` and `0b` literals.
fn coerce_integer(raw: Option<&str>) -> Coerced {
    let Some(trimmed) = raw.map(str::trim) else {
        return Coerced::Absent;
    };

    if trimmed.is_empty() {
        return Coerced::Integer(0);
    }

    if let Some(coerced) = coerce_radix_literal(trimmed) {
        return coerced;
    }

    if let Ok(value) = trimmed.parse::<i128>() {
        return Coerced::Integer(value);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_FLOAT => {
            Coerced::Integer(value as i128)
        }
        _ => Coerced::Invalid,
    }
}

/// `None` when the value carries no radix prefix
fn coerce_radix_literal(value: &str) -> Option<Coerced> {
    let prefix = value.get(..2)?;
    let radix = match prefix.to_ascii_lowercase().as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };

    let digits = &value[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(Coerced::Invalid);
    }

    Some(
        i128::from_str_radix(digits, radix)
            .map(Coerced::Integer)
            .unwrap_or(Coerced::Invalid),
    )
}

/// Raw body of create and update requests
///
/// `title` is kept as an arbitrary JSON value so a wrong type becomes a
/// field error rather than a body decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitlePayload {
    /// The proposed title, any JSON value
    #[serde(default)]
    pub title: Option<Value>,
}

impl TitlePayload {
    /// Validate the title field
    pub fn validate(&self) -> Result<Title, ValidationError> {
        let mut errors = ValidationError::new("Invalid request body");

        match &self.title {
            None | Some(Value::Null) => {
                errors.add_field_error("title", "REQUIRED", "title is required");
            }
            Some(Value::String(raw)) => match Title::parse(raw) {
                Ok(title) => return Ok(title),
                Err(e) => errors.add_field_error("title", e.code(), e.to_string()),
            },
            Some(_) => {
                errors.add_field_error("title", "INVALID_TYPE", "title must be a string");
            }
        }

        Err(errors)
    }
}

/// Form-level error for a body that could not be decoded
pub fn json_rejection(rejection: &JsonRejection) -> ValidationError {
    let code = match rejection {
        JsonRejection::MissingJsonContentType(_) => "UNSUPPORTED_MEDIA_TYPE",
        JsonRejection::JsonSyntaxError(_) => "INVALID_JSON",
        _ => "INVALID_BODY",
    };
    ValidationError::form(code, rejection.body_text())
}

/// Form-level error for a query string that could not be decoded
pub fn query_rejection(rejection: &QueryRejection) -> ValidationError {
    ValidationError::form("INVALID_QUERY", rejection.body_text())
}
