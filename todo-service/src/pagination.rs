//! Offset/limit pagination types
//!
//! [`Pagination`] is what callers ask for; [`Paging`] is the metadata sent
//! back alongside a [`Page`] of results.
//!
//! ```rust
//! use todo_service::pagination::{Pagination, Paging};
//!
//! let request = Pagination::new(0, 20);
//! let paging = Paging::new(&request, 5, 5);
//! assert!(!paging.has_more);
//!
//! let paging = Paging::new(&request, 20, 25);
//! assert!(paging.has_more);
//! ```

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_LIMIT: u64 = 20;

/// Maximum allowed items per page
pub const MAX_LIMIT: u64 = 100;

/// Pagination parameters for limiting query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create new pagination parameters
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Offset as a `usize`, saturating on narrow targets
    #[must_use]
    pub fn offset_usize(&self) -> usize {
        usize::try_from(self.offset).unwrap_or(usize::MAX)
    }

    /// Limit as a `usize`, saturating on narrow targets
    #[must_use]
    pub fn limit_usize(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Position of a page within the full ordered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Offset that was requested
    pub offset: u64,
    /// Limit that was requested
    pub limit: u64,
    /// Total number of items in the collection
    pub total: u64,
    /// Whether items exist past this page
    pub has_more: bool,
}

impl Paging {
    /// Compute paging metadata for a page of `returned` items out of `total`
    ///
    /// `has_more` is true iff `offset + returned < total`.
    #[must_use]
    pub fn new(pagination: &Pagination, returned: u64, total: u64) -> Self {
        Self {
            offset: pagination.offset,
            limit: pagination.limit,
            total,
            has_more: pagination.offset.saturating_add(returned) < total,
        }
    }
}

/// A page of results with its paging metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Paging metadata
    pub paging: Paging,
}

impl<T> Page<T> {
    /// Wrap a page of items, computing `has_more` from the item count
    pub fn new(data: Vec<T>, pagination: &Pagination, total: u64) -> Self {
        let paging = Paging::new(pagination, data.len() as u64, total);
        Self { data, paging }
    }
}
