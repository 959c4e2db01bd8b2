//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    repository::{InMemoryTodoRepository, TodoRepository},
    service::TodoService,
};

/// Application state shared across handlers
///
/// Generic over the storage backend; the default is the in-memory store.
/// Cloning is cheap: both fields are reference counted.
pub struct AppState<R = InMemoryTodoRepository> {
    config: Arc<Config>,
    todos: TodoService<R>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            todos: self.todos.clone(),
        }
    }
}

impl AppState<InMemoryTodoRepository> {
    /// State backed by a fresh, empty in-memory store
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(InMemoryTodoRepository::new()))
    }
}

impl<R: TodoRepository> AppState<R> {
    /// Create state over an existing repository
    pub fn new(config: Config, repository: Arc<R>) -> Self {
        Self {
            config: Arc::new(config),
            todos: TodoService::new(repository),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Todo operations
    pub fn todos(&self) -> &TodoService<R> {
        &self.todos
    }
}
