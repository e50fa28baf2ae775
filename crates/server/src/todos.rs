//! Todo API endpoints

use api_types::{
    health::{Banner, Health},
    todo::{Todo, TodoId, TodoNew, TodoQuery, TodoUpdate},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;

use crate::{ServerError, server::ServerState};

pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: "Todo API is running!".to_string(),
    })
}

pub async fn health() -> Json<Health> {
    Json(Health::healthy())
}

/// Handle requests for listing todos, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TodoQuery>,
) -> Json<Vec<Todo>> {
    let store = state.store.lock().await;
    Json(store.list(&query))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ServerError> {
    let store = state.store.lock().await;
    Ok(Json(store.get(TodoId(id))?))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TodoNew>,
) -> Result<Json<Todo>, ServerError> {
    let mut store = state.store.lock().await;
    let todo = store.create(payload, Utc::now())?;
    tracing::info!(id = %todo.id, "todo created");
    Ok(Json(todo))
}

/// Handle partial updates; absent fields are left untouched
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TodoUpdate>,
) -> Result<Json<Todo>, ServerError> {
    let mut store = state.store.lock().await;
    Ok(Json(store.update(TodoId(id), payload, Utc::now())?))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<Banner>, ServerError> {
    let mut store = state.store.lock().await;
    store.delete(TodoId(id))?;
    tracing::info!(id, "todo deleted");
    Ok(Json(Banner {
        message: "Todo deleted successfully".to_string(),
    }))
}

pub async fn toggle(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ServerError> {
    let mut store = state.store.lock().await;
    Ok(Json(store.toggle(TodoId(id), Utc::now())?))
}
