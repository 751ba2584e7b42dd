//! Supplier route handlers

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
use crate::models::{Excursion, Supplier, SupplierInput, SupplierSummary};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(detail).put(update).delete(remove))
}

/// Supplier with the excursions it runs
#[derive(Debug, Serialize)]
pub struct SupplierDetail {
    pub supplier: Supplier,
    pub excursions: Vec<Excursion>,
    pub summary: SupplierSummary,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Supplier>>> {
    if let Some(cached) = state.cache.suppliers.get().await {
        tracing::debug!("Cache HIT for supplier list");
        return Ok(Json((*cached).clone()));
    }

    tracing::debug!("Cache MISS for supplier list");
    let generation = state.cache.suppliers.generation();
    let suppliers = db::list_suppliers(&state.db).await?;
    let suppliers = state.cache.suppliers.fill(generation, suppliers).await;
    Ok(Json((*suppliers).clone()))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SupplierDetail>> {
    let supplier = db::get_supplier(&state.db, id).await?;
    let excursions = db::list_excursions_for_supplier(&state.db, id).await?;
    let summary = SupplierSummary::from_excursions(&excursions);

    Ok(Json(SupplierDetail {
        supplier,
        excursions,
        summary,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> Result<(StatusCode, Json<Supplier>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let supplier = db::insert_supplier(&state.db, &input).await?;
    state.cache.suppliers.invalidate().await;
    tracing::info!("Created supplier {} ({})", supplier.name, supplier.id);
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SupplierInput>,
) -> Result<Json<Supplier>> {
    input.validate().map_err(AppError::BadRequest)?;
    let supplier = db::update_supplier(&state.db, id, &input).await?;
    state.cache.suppliers.invalidate().await;
    Ok(Json(supplier))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    db::delete_supplier(&state.db, id).await?;
    state.cache.suppliers.invalidate().await;
    tracing::info!("Deleted supplier {}", id);
    Ok(StatusCode::NO_CONTENT)
}
