//! Router assembly
//!
//! ```text
//! GET    /health
//! GET    {base}?offset=&limit=
//! POST   {base}
//! GET    {base}/{id}
//! PUT    {base}/{id}
//! DELETE {base}/{id}
//! PATCH  {base}/{id}/toggle
//! ```
//!
//! `{base}` is `api.base_path` (`/todos` by default).

use axum::{
    routing::{get, patch},
    Router,
};

use crate::{
    handlers::{create_todo, delete_todo, get_todo, list_todos, toggle_todo, update_todo},
    health::health,
    repository::TodoRepository,
    state::AppState,
};

/// Todo routes relative to the base path
fn todo_routes<R: TodoRepository>() -> Router<AppState<R>> {
    Router::new()
        .route("/", get(list_todos::<R>).post(create_todo::<R>))
        .route(
            "/{id}",
            get(get_todo::<R>)
                .put(update_todo::<R>)
                .delete(delete_todo::<R>),
        )
        .route("/{id}/toggle", patch(toggle_todo::<R>))
}

/// Full application router without middleware
///
/// Wrap it with [`Server::apply_middleware`](crate::server::Server::apply_middleware)
/// or hand it to [`Server::serve`](crate::server::Server::serve).
pub fn router<R: TodoRepository>(state: AppState<R>) -> Router {
    let base_path = state.config().api.base_path.clone();

    Router::new()
        .route("/health", get(health::<R>))
        .nest(&base_path, todo_routes::<R>())
        .with_state(state)
}
