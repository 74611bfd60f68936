// rest/routes/memories.rs — memory collection routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::memory::{Memory, NewMemory};
use crate::AppContext;

pub async fn list_memories(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let memories = ctx.memories.list().await;
    Json(json!({ "memories": memories }))
}

pub async fn get_memory(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Memory>, (StatusCode, Json<Value>)> {
    match ctx.memories.get(&id).await {
        Some(m) => Ok(Json(m)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Memory not found" })),
        )),
    }
}

pub async fn create_memory(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<NewMemory>,
) -> Result<Json<Memory>, (StatusCode, Json<Value>)> {
    let memory = Memory::create(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    match ctx.memories.add(memory.clone()).await {
        Ok(()) => Ok(Json(memory)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}

pub async fn delete_memory(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.memories.remove(&id).await {
        Ok(true) => Ok(Json(json!({ "removed": true }))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Memory not found" })),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}
