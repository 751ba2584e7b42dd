//! Quotation API route handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::models::{QuotationRow, QuotationStatus};
use super::requests::{
    QuotationDraftRequest, QuotationListQuery, SaveQuotationRequest, UpdateStatusRequest,
};
use super::responses::{PricingErrorResponse, QuotationResponse, QuotationTotalsResponse};
use super::services::{self, LoadedQuotation};

/// Routes mounted under `/api/quotations`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/calculate", post(calculate))
        .route("/:id", get(detail).put(replace).delete(remove))
        .route("/:id/status", patch(update_status))
        .route("/:id/export", get(export))
}

impl From<LoadedQuotation> for QuotationResponse {
    fn from(loaded: LoadedQuotation) -> Self {
        let status_label = loaded
            .row
            .status
            .parse::<QuotationStatus>()
            .map(|status| status.label())
            .unwrap_or("Unknown");

        Self {
            quotation: loaded.row,
            status_label,
            totals: loaded.totals.map(Into::into),
            pricing_error: loaded.pricing_error.as_ref().map(PricingErrorResponse::from),
            integrity_warnings: loaded.integrity_warnings,
        }
    }
}

/// Price a draft without saving it
pub async fn calculate(Json(draft): Json<QuotationDraftRequest>) -> Result<Json<QuotationTotalsResponse>> {
    let totals = services::calculate(&draft)?;
    Ok(Json(totals.into()))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<QuotationListQuery>,
) -> Result<Json<Vec<QuotationRow>>> {
    let rows = services::list_quotations(&state.db, &state.cache, query.search.as_deref()).await?;
    Ok(Json(rows))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuotationResponse>> {
    let loaded = services::load_quotation(&state.db, id).await?;
    Ok(Json(loaded.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<SaveQuotationRequest>,
) -> Result<(StatusCode, Json<QuotationResponse>)> {
    let created = services::create_quotation(&state.db, &state.cache, &request).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveQuotationRequest>,
) -> Result<Json<QuotationResponse>> {
    let updated = services::replace_quotation(&state.db, &state.cache, id, &request).await?;
    Ok(Json(updated.into()))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<QuotationRow>> {
    let row = services::set_status(&state.db, &state.cache, id, request.status).await?;
    Ok(Json(row))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    services::delete_quotation(&state.db, &state.cache, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download the plain-text summary
pub async fn export(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let export = services::export_quotation(&state.db, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", export.filename.replace('"', ""));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}
