//! Storage layer for todo items
//!
//! - [`TodoRepository`]: the storage capability used by the service layer
//! - [`InMemoryTodoRepository`]: volatile, process-local implementation
//! - [`RepositoryError`]: structured errors with operation context
//!
//! Another backend only has to implement [`TodoRepository`]; the service and
//! the HTTP layer are generic over it.

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryTodoRepository;
pub use traits::{RepositoryResult, TodoRepository};
