//! Type-safe identifiers using the TypeID specification
//!
//! Todo items and HTTP requests are both identified by TypeIDs: a short
//! prefix, an underscore and a base32-encoded UUIDv7.
//!
//! ```rust
//! use todo_service::ids::{RequestId, TodoId};
//!
//! let todo = TodoId::new();
//! assert!(todo.as_str().starts_with("todo_"));
//!
//! let request = RequestId::new();
//! assert!(request.as_str().starts_with("req_"));
//! ```
//!
//! Ids are allocated without consulting the store.

use http::Request;
use mti::prelude::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Identifier of a todo item.
///
/// Generated by the repository on creation and never changed afterwards.
/// Serialized as a plain string (`todo_01h455vb4pex5vsknk084sn02q`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TodoId(MagicTypeId);

impl TodoId {
    /// The prefix used for todo ids
    pub const PREFIX: &'static str = "todo";

    /// Allocates a fresh, globally unique todo id.
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_with_prefix(s, Self::PREFIX).map(Self)
    }
}

impl AsRef<str> for TodoId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<TodoId> for String {
    fn from(id: TodoId) -> Self {
        id.0.to_string()
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A type-safe request identifier for log correlation.
///
/// Example format: `req_01h455vb4pex5vsknk084sn02q`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    /// Creates a new request ID with a UUIDv7 (time-sortable).
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_with_prefix(s: &str, expected: &str) -> Result<MagicTypeId, IdError> {
    let mti = MagicTypeId::from_str(s).map_err(IdError::Parse)?;

    if mti.prefix().as_str() != expected {
        return Err(IdError::InvalidPrefix {
            expected: expected.to_string(),
            actual: mti.prefix().as_str().to_string(),
        });
    }

    Ok(mti)
}

/// Error type for identifier parsing.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The ID could not be parsed as a valid TypeID.
    #[error("failed to parse id: {0}")]
    Parse(#[from] MagicTypeIdError),

    /// The prefix was not the expected value.
    #[error("invalid prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix {
        /// The expected prefix.
        expected: String,
        /// The actual prefix found.
        actual: String,
    },
}

/// A `MakeRequestId` implementation that generates `RequestId`s for tower-http.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_id_new() {
        let id = TodoId::new();
        assert!(id.as_str().starts_with("todo_"));
        // prefix (4) + underscore (1) + suffix (26)
        assert_eq!(id.as_str().len(), 31);
    }

    #[test]
    fn test_todo_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..1_000).map(|_| TodoId::new()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn test_todo_id_parse_roundtrip() {
        let id = TodoId::new();
        let parsed: TodoId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_todo_id_rejects_request_prefix() {
        let result = TodoId::from_str("req_01h455vb4pex5vsknk084sn02q");
        match result.unwrap_err() {
            IdError::InvalidPrefix { expected, actual } => {
                assert_eq!(expected, "todo");
                assert_eq!(actual, "req");
            }
            other => panic!("Expected InvalidPrefix error, got {other:?}"),
        }
    }

    #[test]
    fn test_todo_id_rejects_garbage() {
        assert!(TodoId::from_str("todo_invalid").is_err());
        assert!(TodoId::from_str("").is_err());
    }

    #[test]
    fn test_todo_id_serializes_as_string() {
        let id = TodoId::new();
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));

        let back: TodoId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_make_typed_request_id() {
        let mut maker = MakeTypedRequestId;
        let request = http::Request::builder().body(()).unwrap();

        let id = maker.make_request_id(&request).unwrap();
        let header_value = id.into_header_value();
        assert!(header_value.to_str().unwrap().starts_with("req_"));
    }
}
