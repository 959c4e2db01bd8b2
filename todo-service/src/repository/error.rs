//! Repository error types
//!
//! ```rust
//! use todo_service::ids::TodoId;
//! use todo_service::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
//!
//! let id = TodoId::new();
//! let error = RepositoryError::not_found(RepositoryOperation::ToggleComplete, &id);
//! assert!(error.is_not_found());
//! assert_eq!(error.entity_id, Some(id.to_string()));
//! ```

use std::fmt;

use crate::ids::TodoId;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Reading a page of items
    ListPaginated,
    /// Counting items
    Count,
    /// Looking up a single item
    FindById,
    /// Creating an item
    Create,
    /// Replacing an item's title
    UpdateTitle,
    /// Flipping an item's completion flag
    ToggleComplete,
    /// Removing an item
    Delete,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListPaginated => write!(f, "list_paginated"),
            Self::Count => write!(f, "count"),
            Self::FindById => write!(f, "find_by_id"),
            Self::Create => write!(f, "create"),
            Self::UpdateTitle => write!(f, "update_title"),
            Self::ToggleComplete => write!(f, "toggle_complete"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Item was not found
    NotFound,
    /// The storage backend failed
    Storage,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Storage => write!(f, "storage"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The id of the item involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_id: None,
        }
    }

    /// Create a "not found" error for the given item
    pub fn not_found(operation: RepositoryOperation, id: &TodoId) -> Self {
        Self {
            operation,
            kind: RepositoryErrorKind::NotFound,
            message: "Todo not found".to_string(),
            entity_id: Some(id.to_string()),
        }
    }

    /// Create a storage backend error
    pub fn storage(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Storage, message)
    }

    /// Check whether this is a "not found" error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == RepositoryErrorKind::NotFound
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref id) = self.entity_id {
            write!(f, " [{}]", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}
