//! Booking route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{Booking, BookingExcursion, BookingInput, BookingSummary, ProviderStatus};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(detail).put(update).delete(remove))
        .route(
            "/:id/excursions/:booking_excursion_id/provider-status",
            patch(update_provider_status),
        )
}

/// Booking with its excursions and their total
#[derive(Debug, Serialize)]
pub struct BookingDetail {
    pub booking: Booking,
    pub status_label: String,
    pub excursions: Vec<BookingExcursion>,
    pub summary: BookingSummary,
}

/// Progress update for an excursion provider
#[derive(Debug, Deserialize)]
pub struct ProviderStatusRequest {
    pub provider_status: ProviderStatus,
    #[serde(default)]
    pub provider_notes: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Booking>>> {
    Ok(Json(db::list_bookings(&state.db).await?))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<BookingDetail>> {
    let booking = db::get_booking(&state.db, id).await?;
    let excursions = db::list_booking_excursions(&state.db, id).await?;
    let summary = BookingSummary::from_excursions(&excursions)
        .ok_or_else(|| AppError::Internal("booking excursions total overflowed".to_string()))?;

    Ok(Json(BookingDetail {
        status_label: booking.status_label(),
        booking,
        excursions,
        summary,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<BookingInput>,
) -> Result<(StatusCode, Json<Booking>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let booking = db::insert_booking(&state.db, &input).await?;
    tracing::info!("Created booking {} ({})", booking.id, booking.status);
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BookingInput>,
) -> Result<Json<Booking>> {
    input.validate().map_err(AppError::BadRequest)?;
    Ok(Json(db::update_booking(&state.db, id, &input).await?))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    db::delete_booking(&state.db, id).await?;
    tracing::info!("Deleted booking {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_provider_status(
    State(state): State<AppState>,
    Path((id, booking_excursion_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<ProviderStatusRequest>,
) -> Result<Json<BookingExcursion>> {
    let updated = db::update_provider_status(
        &state.db,
        id,
        booking_excursion_id,
        request.provider_status,
        request.provider_notes,
    )
    .await?;
    tracing::info!(
        "Booking {} excursion {} provider status {}",
        id,
        booking_excursion_id,
        updated.provider_status
    );
    Ok(Json(updated))
}
