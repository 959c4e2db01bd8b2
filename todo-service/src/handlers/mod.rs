//! HTTP handlers for the todo collection
//!
//! - [`todos`]: one axum handler per endpoint, generic over the repository
//! - [`validation`]: coercion and checks for query strings and bodies
//!
//! Handlers return [`crate::error::Result`], so every failure is rendered by
//! the crate error type.

pub mod todos;
pub mod validation;

pub use todos::{create_todo, delete_todo, get_todo, list_todos, toggle_todo, update_todo};
pub use validation::{ListParams, TitlePayload};
