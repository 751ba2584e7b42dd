//! Health check handlers

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::cache::CacheStats;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/cache", get(cache_stats))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
