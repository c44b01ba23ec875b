//! Request handlers. Each one locks the store once, performs a single store
//! operation and serializes the result.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    Json,
};
use serde::Serialize;
use todo_core::{to_iso8601, CreateTodo, StoreError, Todo, TodoStats, UpdateTodo};
use tracing::{debug, info};

use crate::error::{optional_json, ApiError, JsonBody};
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
}

pub async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    let todos = state.store.read().await;
    Json(todos.list())
}

pub async fn create_todo(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let text = input.text.as_deref().unwrap_or_default();
    let todo = state.store.write().await.create(text)?;
    info!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// The id is resolved before the body is looked at, so an unknown id is a
/// 404 whatever the body holds. A missing body is an empty update.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(id)?;
    let changes = optional_json::<UpdateTodo>(&headers, &body);

    let mut store = state.store.write().await;
    if store.get(id).is_none() {
        return Err(StoreError::NotFound(id).into());
    }
    let todo = store.update(id, changes?)?;
    info!(id, completed = todo.completed, "updated todo");
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(id)?;
    let todo = state.store.write().await.delete(id)?;
    info!(id, "deleted todo");
    Ok(Json(todo))
}

pub async fn todo_stats(State(state): State<AppState>) -> Json<TodoStats> {
    let todos = state.store.read().await;
    Json(todos.stats())
}

/// `PUT`/`DELETE /todos/stats`: the segment sits where an id would, and it
/// is not one.
pub async fn stats_is_not_a_todo() -> ApiError {
    ApiError::UnknownId("stats".to_string())
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "OK".to_string(),
        timestamp: to_iso8601(&state.clock.now()),
    })
}

pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    debug!(%method, %uri, "no route");
    ApiError::RouteNotFound
}

/// Ids are plain `u64`s. Anything else cannot name a stored todo.
fn parse_id(raw: String) -> Result<u64, ApiError> {
    raw.parse::<u64>().map_err(|_| ApiError::UnknownId(raw))
}
