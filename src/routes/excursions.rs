//! Excursion route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{Excursion, ExcursionInput};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(detail).put(update).delete(remove))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Excursion>>> {
    Ok(Json(db::list_excursions(&state.db).await?))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Excursion>> {
    Ok(Json(db::get_excursion(&state.db, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ExcursionInput>,
) -> Result<(StatusCode, Json<Excursion>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let excursion = db::insert_excursion(&state.db, &input).await?;
    tracing::info!("Created excursion {} ({})", excursion.name, excursion.id);
    Ok((StatusCode::CREATED, Json(excursion)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ExcursionInput>,
) -> Result<Json<Excursion>> {
    input.validate().map_err(AppError::BadRequest)?;
    Ok(Json(db::update_excursion(&state.db, id, &input).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    db::delete_excursion(&state.db, id).await?;
    tracing::info!("Deleted excursion {}", id);
    Ok(StatusCode::NO_CONTENT)
}
