//! Todo endpoint handlers
//!
//! Each handler validates its input, calls [`TodoService`](crate::service::TodoService)
//! and maps the result. Validation failures never reach the service.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use super::validation::{json_rejection, query_rejection, ListParams, TitlePayload};
use crate::{
    error::{Error, Result},
    ids::TodoId,
    models::Todo,
    pagination::Page,
    repository::TodoRepository,
    responses::{Acknowledgement, Created},
    state::AppState,
};

/// A path segment that is not a todo id cannot name a live item
fn parse_id(raw: &str) -> Result<TodoId> {
    raw.parse().map_err(|_| Error::todo_not_found())
}

/// `GET {base}?offset=&limit=`
pub async fn list_todos<R: TodoRepository>(
    State(state): State<AppState<R>>,
    query: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<Todo>>> {
    let Query(params) = query.map_err(|e| query_rejection(&e))?;
    let pagination = params.validate()?;
    Ok(Json(state.todos().get_paginated(pagination).await?))
}

/// `GET {base}/{id}`
pub async fn get_todo<R: TodoRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Todo>> {
    let id = parse_id(&id)?;
    Ok(Json(state.todos().get(&id).await?))
}

/// `POST {base}`
pub async fn create_todo<R: TodoRepository>(
    State(state): State<AppState<R>>,
    body: std::result::Result<Json<TitlePayload>, JsonRejection>,
) -> Result<Created<Todo>> {
    let Json(payload) = body.map_err(|e| json_rejection(&e))?;
    let title = payload.validate()?;

    let todo = state.todos().create(title).await?;
    let location = format!("{}/{}", state.config().api.base_path, todo.id);
    Ok(Created::new(todo).with_location(location))
}

/// `PUT {base}/{id}`
pub async fn update_todo<R: TodoRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<TitlePayload>, JsonRejection>,
) -> Result<Json<Todo>> {
    let Json(payload) = body.map_err(|e| json_rejection(&e))?;
    let title = payload.validate()?;
    let id = parse_id(&id)?;
    Ok(Json(state.todos().update(&id, title).await?))
}

/// `PATCH {base}/{id}/toggle`
pub async fn toggle_todo<R: TodoRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Todo>> {
    let id = parse_id(&id)?;
    Ok(Json(state.todos().toggle(&id).await?))
}

/// `DELETE {base}/{id}`
pub async fn delete_todo<R: TodoRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Acknowledgement> {
    let id = parse_id(&id)?;
    state.todos().delete(&id).await
}
