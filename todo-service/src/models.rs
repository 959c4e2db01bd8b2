//! Domain model for todo items

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::ids::TodoId;

/// Maximum title length after trimming, in UTF-16 code units
///
/// Clients measure strings in UTF-16, so a character outside the Basic
/// Multilingual Plane (most emoji) counts twice.
pub const TITLE_MAX_LEN: usize = 120;

/// A todo item
///
/// Serialized with camelCase keys:
/// `{"id": "...", "title": "...", "isCompleted": false, "createdAt": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Store-assigned identifier
    pub id: TodoId,
    /// Trimmed, length-bounded title
    pub title: Title,
    /// Completion flag, only changed by toggling
    pub is_completed: bool,
    /// Creation timestamp, the sort key for listings
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Build a fresh, incomplete item
    pub fn new(id: TodoId, title: Title, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            is_completed: false,
            created_at,
        }
    }
}

/// A validated todo title
///
/// Can only be obtained through [`Title::parse`], so every `Title` is
/// trimmed and between 1 and [`TITLE_MAX_LEN`] UTF-16 units long.
///
/// ```rust
/// use todo_service::models::{Title, TitleError};
///
/// let title = Title::parse("  Buy milk \n").unwrap();
/// assert_eq!(title.as_str(), "Buy milk");
///
/// assert_eq!(Title::parse("   "), Err(TitleError::Empty));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    /// Trim and validate a raw title
    pub fn parse(raw: &str) -> Result<Self, TitleError> {
        let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        if trimmed.is_empty() {
            return Err(TitleError::Empty);
        }

        let length = trimmed.encode_utf16().count();
        if length > TITLE_MAX_LEN {
            return Err(TitleError::TooLong {
                length,
                max: TITLE_MAX_LEN,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the title text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Title {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Title::parse(&raw).map_err(de::Error::custom)
    }
}

/// Reasons a raw title is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    /// Nothing left after trimming
    #[error("title must not be empty")]
    Empty,

    /// Longer than the allowed bound
    #[error("title must be at most {max} characters, got {length}")]
    TooLong {
        /// UTF-16 length after trimming
        length: usize,
        /// The bound that was exceeded
        max: usize,
    },
}

impl TitleError {
    /// Machine-readable code used in field errors
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty => "TOO_SHORT",
            Self::TooLong { .. } => "TOO_LONG",
        }
    }
}
