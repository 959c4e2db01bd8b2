//! In-memory todo store
//!
//! Items live in an id → entry map. A second ordered map indexes ids by
//! creation key (`created_at` descending, then insertion sequence
//! descending), so a page is a walk over the index instead of a sort.
//!
//! All state sits behind one `tokio::sync::RwLock`. Mutations hold the
//! write lock from the existence check through the write.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{RepositoryResult, TodoRepository};
use crate::ids::TodoId;
use crate::models::{Title, Todo};
use crate::pagination::Pagination;

/// Index key ordering items newest first
///
/// Ties on `created_at` fall back to insertion order, newest first, so the
/// order is total and identical across listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CreationKey {
    created_at: Reverse<DateTime<Utc>>,
    sequence: Reverse<u64>,
}

#[derive(Debug)]
struct Entry {
    todo: Todo,
    key: CreationKey,
}

#[derive(Debug, Default)]
struct Store {
    items: HashMap<TodoId, Entry>,
    by_creation: BTreeMap<CreationKey, TodoId>,
    next_sequence: u64,
}

impl Store {
    fn page(&self, pagination: Pagination) -> Vec<Todo> {
        self.by_creation
            .values()
            .skip(pagination.offset_usize())
            .take(pagination.limit_usize())
            .filter_map(|id| self.items.get(id))
            .map(|entry| entry.todo.clone())
            .collect()
    }

    fn total(&self) -> u64 {
        self.items.len() as u64
    }

    fn insert(&mut self, todo: Todo) {
        let key = CreationKey {
            created_at: Reverse(todo.created_at),
            sequence: Reverse(self.next_sequence),
        };
        self.next_sequence += 1;
        self.by_creation.insert(key, todo.id.clone());
        self.items.insert(todo.id.clone(), Entry { todo, key });
    }

    fn remove(&mut self, id: &TodoId) -> bool {
        match self.items.remove(id) {
            Some(entry) => {
                self.by_creation.remove(&entry.key);
                true
            }
            None => false,
        }
    }
}

/// Process-local, volatile implementation of [`TodoRepository`]
///
/// Construct one per process (or per test) and share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    store: RwLock<Store>,
}

impl InMemoryTodoRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoRepository for InMemoryTodoRepository {
    async fn list_paginated(&self, pagination: Pagination) -> RepositoryResult<Vec<Todo>> {
        Ok(self.store.read().await.page(pagination))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.store.read().await.total())
    }

    async fn find_by_id(&self, id: &TodoId) -> RepositoryResult<Option<Todo>> {
        let store = self.store.read().await;
        Ok(store.items.get(id).map(|entry| entry.todo.clone()))
    }

    async fn create(&self, title: Title) -> RepositoryResult<Todo> {
        let todo = Todo::new(TodoId::new(), title, Utc::now());
        self.store.write().await.insert(todo.clone());
        Ok(todo)
    }

    async fn update_title(&self, id: &TodoId, title: Title) -> RepositoryResult<Todo> {
        let mut store = self.store.write().await;
        let entry = store
            .items
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::UpdateTitle, id))?;
        entry.todo.title = title;
        Ok(entry.todo.clone())
    }

    async fn toggle_complete(&self, id: &TodoId) -> RepositoryResult<Todo> {
        let mut store = self.store.write().await;
        let entry = store
            .items
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::ToggleComplete, id))?;
        entry.todo.is_completed = !entry.todo.is_completed;
        Ok(entry.todo.clone())
    }

    async fn delete(&self, id: &TodoId) -> RepositoryResult<bool> {
        Ok(self.store.write().await.remove(id))
    }

    async fn list_page(&self, pagination: Pagination) -> RepositoryResult<(Vec<Todo>, u64)> {
        let store = self.store.read().await;
        Ok((store.page(pagination), store.total()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn title(s: &str) -> Title {
        Title::parse(s).unwrap()
    }

    async fn seeded(n: usize) -> InMemoryTodoRepository {
        let repo = InMemoryTodoRepository::new();
        for i in 0..n {
            repo.create(title(&format!("item {i}"))).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let repo = InMemoryTodoRepository::new();
        let created = repo.create(title("Buy milk")).await.unwrap();

        assert_eq!(created.title.as_str(), "Buy milk");
        assert!(!created.is_completed);

        let found = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let repo = seeded(2).await;
        assert_eq!(repo.find_by_id(&TodoId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ids_unique() {
        let repo = seeded(50).await;
        let page = repo.list_paginated(Pagination::new(0, 100)).await.unwrap();
        let ids: HashSet<_> = page.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_listing_newest_first() {
        let repo = seeded(5).await;
        let page = repo.list_paginated(Pagination::new(0, 10)).await.unwrap();

        let titles: Vec<_> = page.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["item 4", "item 3", "item 2", "item 1", "item 0"]);
        assert!(page.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_listing_is_stable() {
        let repo = seeded(12).await;
        let first = repo.list_paginated(Pagination::new(0, 20)).await.unwrap();
        let second = repo.list_paginated(Pagination::new(0, 20)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_pages_partition_listing() {
        let repo = seeded(7).await;
        let all = repo.list_paginated(Pagination::new(0, 100)).await.unwrap();

        let mut paged = Vec::new();
        for offset in (0..7).step_by(3) {
            paged.extend(repo.list_paginated(Pagination::new(offset, 3)).await.unwrap());
        }
        assert_eq!(paged, all);
    }

    #[tokio::test]
    async fn test_offset_past_end_is_empty() {
        let repo = seeded(3).await;
        assert!(repo.list_paginated(Pagination::new(3, 10)).await.unwrap().is_empty());
        assert!(repo.list_paginated(Pagination::new(u64::MAX, 10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_title_preserves_other_fields() {
        let repo = InMemoryTodoRepository::new();
        let created = repo.create(title("Learn DDD")).await.unwrap();
        repo.toggle_complete(&created.id).await.unwrap();

        let updated = repo.update_title(&created.id, title("Learn DDD deeply")).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.is_completed);
        assert_eq!(updated.title.as_str(), "Learn DDD deeply");
    }

    #[tokio::test]
    async fn test_update_keeps_list_position() {
        let repo = seeded(3).await;
        let before = repo.list_paginated(Pagination::new(0, 10)).await.unwrap();
        repo.update_title(&before[2].id, title("renamed")).await.unwrap();

        let after = repo.list_paginated(Pagination::new(0, 10)).await.unwrap();
        let ids_before: Vec<_> = before.iter().map(|t| &t.id).collect();
        let ids_after: Vec<_> = after.iter().map(|t| &t.id).collect();
        assert_eq!(ids_before, ids_after);
        assert_eq!(after[2].title.as_str(), "renamed");
    }

    #[tokio::test]
    async fn test_toggle_is_involution() {
        let repo = InMemoryTodoRepository::new();
        let created = repo.create(title("Walk dog")).await.unwrap();

        let once = repo.toggle_complete(&created.id).await.unwrap();
        let twice = repo.toggle_complete(&created.id).await.unwrap();
        assert!(once.is_completed);
        assert_eq!(twice, created);
    }

    #[tokio::test]
    async fn test_mutations_on_missing_id_report_not_found() {
        let repo = seeded(1).await;
        let missing = TodoId::new();

        let err = repo.update_title(&missing, title("x")).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.operation, RepositoryOperation::UpdateTitle);

        let err = repo.toggle_complete(&missing).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.operation, RepositoryOperation::ToggleComplete);

        assert!(!repo.delete(&missing).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_from_map_and_index() {
        let repo = seeded(3).await;
        let page = repo.list_paginated(Pagination::new(0, 10)).await.unwrap();
        let victim = page[1].id.clone();

        assert!(repo.delete(&victim).await.unwrap());
        assert!(!repo.delete(&victim).await.unwrap());

        let remaining = repo.list_paginated(Pagination::new(0, 10)).await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|t| t.id != victim));
        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.toggle_complete(&victim).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_page_matches_parts() {
        let repo = seeded(4).await;
        let (items, total) = repo.list_page(Pagination::new(1, 2)).await.unwrap();
        assert_eq!(items, repo.list_paginated(Pagination::new(1, 2)).await.unwrap());
        assert_eq!(total, 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_are_not_lost() {
        let repo = Arc::new(InMemoryTodoRepository::new());
        let created = repo.create(title("contended")).await.unwrap();

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let id = created.id.clone();
                tokio::spawn(async move { repo.toggle_complete(&id).await.unwrap() })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        // An even number of flips lands back on the original value
        let current = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert!(!current.is_completed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deletes_succeed_once() {
        let repo = Arc::new(seeded(1).await);
        let id = repo.list_paginated(Pagination::default()).await.unwrap()[0].id.clone();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let id = id.clone();
                tokio::spawn(async move { repo.delete(&id).await.unwrap() })
            })
            .collect();

        let mut removed = 0;
        for task in tasks {
            if task.await.unwrap() {
                removed += 1;
            }
        }
        assert_eq!(removed, 1);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
