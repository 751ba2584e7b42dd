//! School route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{Booking, School, SchoolInput, SchoolSummary};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(detail).put(update).delete(remove))
}

/// School with its bookings and booking totals
#[derive(Debug, Serialize)]
pub struct SchoolDetail {
    pub school: School,
    pub bookings: Vec<Booking>,
    pub summary: SchoolSummary,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<School>>> {
    if let Some(cached) = state.cache.schools.get().await {
        tracing::debug!("Cache HIT for school list");
        return Ok(Json((*cached).clone()));
    }

    tracing::debug!("Cache MISS for school list");
    let generation = state.cache.schools.generation();
    let schools = db::list_schools(&state.db).await?;
    let schools = state.cache.schools.fill(generation, schools).await;
    Ok(Json((*schools).clone()))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SchoolDetail>> {
    let school = db::get_school(&state.db, id).await?;
    let bookings = db::list_bookings_for_school(&state.db, id).await?;
    let summary = SchoolSummary::from_bookings(&bookings)
        .ok_or_else(|| AppError::Internal("school revenue overflowed".to_string()))?;

    Ok(Json(SchoolDetail {
        school,
        bookings,
        summary,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<SchoolInput>,
) -> Result<(StatusCode, Json<School>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let school = db::insert_school(&state.db, &input).await?;
    state.cache.schools.invalidate().await;
    tracing::info!("Created school {} ({})", school.name, school.id);
    Ok((StatusCode::CREATED, Json(school)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SchoolInput>,
) -> Result<Json<School>> {
    input.validate().map_err(AppError::BadRequest)?;
    let school = db::update_school(&state.db, id, &input).await?;
    state.cache.schools.invalidate().await;
    Ok(Json(school))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    db::delete_school(&state.db, id).await?;
    state.cache.schools.invalidate().await;
    tracing::info!("Deleted school {}", id);
    Ok(StatusCode::NO_CONTENT)
}
