//! Trip route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{Booking, Excursion, Trip, TripInput, TripSummary};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(detail).put(update).delete(remove))
}

/// Trip with its bookings, excursions and totals
#[derive(Debug, Serialize)]
pub struct TripDetail {
    pub trip: Trip,
    pub bookings: Vec<Booking>,
    pub excursions: Vec<Excursion>,
    pub summary: TripSummary,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Trip>>> {
    if let Some(cached) = state.cache.trips.get().await {
        tracing::debug!("Cache HIT for trip list");
        return Ok(Json((*cached).clone()));
    }

    tracing::debug!("Cache MISS for trip list");
    let generation = state.cache.trips.generation();
    let trips = db::list_trips(&state.db).await?;
    let trips = state.cache.trips.fill(generation, trips).await;
    Ok(Json((*trips).clone()))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<TripDetail>> {
    let trip = db::get_trip(&state.db, id).await?;
    let bookings = db::list_bookings_for_trip(&state.db, id).await?;
    let excursions = db::list_excursions_for_trip(&state.db, id).await?;
    let summary = TripSummary::new(&trip, &bookings, &excursions, Utc::now().date_naive())
        .ok_or_else(|| AppError::Internal("trip revenue overflowed".to_string()))?;

    Ok(Json(TripDetail {
        trip,
        bookings,
        excursions,
        summary,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<TripInput>,
) -> Result<(StatusCode, Json<Trip>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let trip = db::insert_trip(&state.db, &input).await?;
    state.cache.trips.invalidate().await;
    tracing::info!("Created trip {} ({})", trip.title, trip.id);
    Ok((StatusCode::CREATED, Json(trip)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<TripInput>,
) -> Result<Json<Trip>> {
    input.validate().map_err(AppError::BadRequest)?;
    let trip = db::update_trip(&state.db, id, &input).await?;
    state.cache.trips.invalidate().await;
    Ok(Json(trip))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    db::delete_trip(&state.db, id).await?;
    state.cache.trips.invalidate().await;
    tracing::info!("Deleted trip {}", id);
    Ok(StatusCode::NO_CONTENT)
}
