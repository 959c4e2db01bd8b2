//! Repository trait definition
//!
//! Async methods are expressed with return-position `impl Future` so no
//! `async_trait` boxing is needed. Every future is `Send`, which lets the
//! service and the axum handlers stay generic over the backend.

use std::future::Future;

use super::error::RepositoryError;
use crate::ids::TodoId;
use crate::models::{Title, Todo};
use crate::pagination::Pagination;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Storage capability for todo items
///
/// Implementations own the item collection exclusively and hand out clones.
/// Mutations report absence themselves (`NotFound` / `false`) so that the
/// existence check and the write are one atomic step.
///
/// # Example
///
/// ```rust
/// use todo_service::models::Title;
/// use todo_service::pagination::Pagination;
/// use todo_service::repository::{InMemoryTodoRepository, TodoRepository};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let repo = InMemoryTodoRepository::new();
/// let todo = repo.create(Title::parse("Buy milk").unwrap()).await.unwrap();
///
/// let toggled = repo.toggle_complete(&todo.id).await.unwrap();
/// assert!(toggled.is_completed);
///
/// let page = repo.list_paginated(Pagination::default()).await.unwrap();
/// assert_eq!(page.len(), 1);
/// # }
/// ```
pub trait TodoRepository: Send + Sync + 'static {
    /// Up to `limit` items starting at `offset`, newest first
    ///
    /// Returns an empty vector when `offset` is past the end.
    fn list_paginated(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<Vec<Todo>>> + Send;

    /// Current number of items
    fn count(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// The item with this id, or `None`
    fn find_by_id(&self, id: &TodoId) -> impl Future<Output = RepositoryResult<Option<Todo>>> + Send;

    /// Store a new incomplete item with a fresh id and the current time
    fn create(&self, title: Title) -> impl Future<Output = RepositoryResult<Todo>> + Send;

    /// Replace the title, keeping everything else
    ///
    /// # Errors
    ///
    /// `NotFound` if no item has this id.
    fn update_title(
        &self,
        id: &TodoId,
        title: Title,
    ) -> impl Future<Output = RepositoryResult<Todo>> + Send;

    /// Flip the completion flag
    ///
    /// # Errors
    ///
    /// `NotFound` if no item has this id.
    fn toggle_complete(&self, id: &TodoId) -> impl Future<Output = RepositoryResult<Todo>> + Send;

    /// Remove the item; returns `true` if it existed
    fn delete(&self, id: &TodoId) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// A page of items together with the total count
    ///
    /// The default runs [`list_paginated`](Self::list_paginated) then
    /// [`count`](Self::count). Backends that can read both from one snapshot
    /// should override it.
    fn list_page(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<(Vec<Todo>, u64)>> + Send {
        async move {
            let items = self.list_paginated(pagination).await?;
            let total = self.count().await?;
            Ok((items, total))
        }
    }
}
