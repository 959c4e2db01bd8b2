//! Business operations over a [`TodoRepository`]
//!
//! The service adds paging metadata and turns absence into
//! [`Error::NotFound`]. It never pre-checks existence: the repository's own
//! mutation reports it, under the same lock as the write.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::ids::TodoId;
use crate::models::{Title, Todo};
use crate::pagination::{Page, Pagination};
use crate::repository::TodoRepository;
use crate::responses::Acknowledgement;

/// Todo operations, generic over the storage backend
#[derive(Debug)]
pub struct TodoService<R> {
    repository: Arc<R>,
}

impl<R> Clone for TodoService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TodoRepository> TodoService<R> {
    /// Create a service over a shared repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// A page of items, newest first, with paging metadata
    pub async fn get_paginated(&self, pagination: Pagination) -> Result<Page<Todo>> {
        let (items, total) = self.repository.list_page(pagination).await?;
        debug!(
            offset = pagination.offset,
            limit = pagination.limit,
            returned = items.len(),
            total,
            "listed todos"
        );
        Ok(Page::new(items, &pagination, total))
    }

    /// One item by id
    pub async fn get(&self, id: &TodoId) -> Result<Todo> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(Error::todo_not_found)
    }

    /// Store a new item
    pub async fn create(&self, title: Title) -> Result<Todo> {
        let todo = self.repository.create(title).await?;
        info!(todo_id = %todo.id, "created todo");
        Ok(todo)
    }

    /// Replace an item's title
    pub async fn update(&self, id: &TodoId, title: Title) -> Result<Todo> {
        let todo = self.repository.update_title(id, title).await?;
        info!(todo_id = %id, "updated todo title");
        Ok(todo)
    }

    /// Flip an item's completion flag
    pub async fn toggle(&self, id: &TodoId) -> Result<Todo> {
        let todo = self.repository.toggle_complete(id).await?;
        info!(todo_id = %id, is_completed = todo.is_completed, "toggled todo");
        Ok(todo)
    }

    /// Remove an item
    pub async fn delete(&self, id: &TodoId) -> Result<Acknowledgement> {
        if !self.repository.delete(id).await? {
            debug!(todo_id = %id, "delete of unknown todo");
            return Err(Error::todo_not_found());
        }
        info!(todo_id = %id, "deleted todo");
        Ok(Acknowledgement::ok())
    }
}
