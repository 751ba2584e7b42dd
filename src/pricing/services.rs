//! Quotation command services with database access.
//!
//! Every write recomputes the totals from the submitted inputs and persists
//! the derived values. Reads recompute as well, so the stored figures are
//! never trusted for display.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::{AppError, Result};

use super::calculators::{compute_totals, find_subtotal_mismatches};
use super::cost_items::parse_stored_cost_items;
use super::errors::PricingError;
use super::export::{render_export, QuotationExport};
use super::models::{
    QuotationInput, QuotationRow, QuotationStatus, QuotationTotals, SubtotalMismatch,
};
use super::queries;
use super::requests::{QuotationDraftRequest, SaveQuotationRequest};

/// A stored quotation with totals recomputed from its inputs
///
/// Rows written outside this service can hold inputs the engine rejects;
/// those load with `totals` empty and the rejection in `pricing_error`.
#[derive(Debug, Clone)]
pub struct LoadedQuotation {
    pub row: QuotationRow,
    pub totals: Option<QuotationTotals>,
    pub pricing_error: Option<PricingError>,
    pub integrity_warnings: Vec<SubtotalMismatch>,
}

impl LoadedQuotation {
    fn priced(row: QuotationRow, totals: QuotationTotals) -> Self {
        Self {
            row,
            totals: Some(totals),
            pricing_error: None,
            integrity_warnings: Vec::new(),
        }
    }
}

/// Compute totals for an unsaved draft.
pub fn calculate(draft: &QuotationDraftRequest) -> std::result::Result<QuotationTotals, PricingError> {
    compute_totals(&draft.to_input()?)
}

/// List quotations, newest first, optionally filtered by a search term.
pub async fn list_quotations(
    pool: &PgPool,
    cache: &AppCache,
    search: Option<&str>,
) -> Result<Vec<QuotationRow>> {
    let rows = if let Some(cached) = cache.quotations.get().await {
        debug!("Cache HIT for quotation list");
        cached
    } else {
        debug!("Cache MISS for quotation list");
        let generation = cache.quotations.generation();
        let rows = queries::list_quotations(pool).await?;
        cache.quotations.fill(generation, rows).await
    };

    let term = search.unwrap_or_default();
    Ok(rows
        .iter()
        .filter(|row| row.matches_search(term))
        .cloned()
        .collect())
}

/// Load a quotation and recompute its totals from the stored inputs.
pub async fn load_quotation(pool: &PgPool, id: Uuid) -> Result<LoadedQuotation> {
    let row = queries::get_quotation(pool, id).await?;
    Ok(recompute(row))
}

/// Recompute a stored row.
///
/// Stored subtotals that disagree with the recomputation are returned as
/// warnings; the recomputed figures always win.
pub fn recompute(row: QuotationRow) -> LoadedQuotation {
    let stored = match parse_stored_cost_items(&row.cost_items) {
        Ok(stored) => stored,
        Err(e) => return unpriceable(row, e, Vec::new()),
    };

    let integrity_warnings = find_subtotal_mismatches(&stored);
    for mismatch in &integrity_warnings {
        warn!(
            "Quotation {} line {} ({}): stored subtotal {} != recomputed {}",
            row.id, mismatch.index, mismatch.description, mismatch.stored, mismatch.recomputed
        );
    }

    let input = QuotationInput {
        group: row.group(),
        cost_items: stored.into_iter().map(|s| s.item).collect(),
        markup_amount: row.markup_amount,
        exchange_rate: row.exchange_rate,
    };

    match compute_totals(&input) {
        Ok(totals) => LoadedQuotation {
            row,
            totals: Some(totals),
            pricing_error: None,
            integrity_warnings,
        },
        Err(e) => unpriceable(row, e, integrity_warnings),
    }
}

fn unpriceable(
    row: QuotationRow,
    error: PricingError,
    integrity_warnings: Vec<SubtotalMismatch>,
) -> LoadedQuotation {
    warn!("Quotation {} cannot be priced: {}", row.id, error);
    LoadedQuotation {
        row,
        totals: None,
        pricing_error: Some(error),
        integrity_warnings,
    }
}

fn validated_totals(request: &SaveQuotationRequest) -> Result<QuotationTotals> {
    request.validate().map_err(AppError::BadRequest)?;
    Ok(calculate(&request.draft)?)
}

/// Validate, price and insert a new quotation.
pub async fn create_quotation(
    pool: &PgPool,
    cache: &AppCache,
    request: &SaveQuotationRequest,
) -> Result<LoadedQuotation> {
    let totals = validated_totals(request)?;
    let row = queries::insert_quotation(pool, request, &totals).await?;
    cache.quotations.invalidate().await;
    info!("Created quotation {} for {}", row.id, row.school_name);
    Ok(LoadedQuotation::priced(row, totals))
}

/// Replace every editable field of a quotation and re-price it.
pub async fn replace_quotation(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    request: &SaveQuotationRequest,
) -> Result<LoadedQuotation> {
    let totals = validated_totals(request)?;
    let row = queries::update_quotation(pool, id, request, &totals).await?;
    cache.quotations.invalidate().await;
    info!("Updated quotation {}", id);
    Ok(LoadedQuotation::priced(row, totals))
}

/// Change the status label. Pricing is untouched.
pub async fn set_status(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    status: QuotationStatus,
) -> Result<QuotationRow> {
    let row = queries::update_quotation_status(pool, id, status).await?;
    cache.quotations.invalidate().await;
    info!("Quotation {} marked {}", id, status);
    Ok(row)
}

pub async fn delete_quotation(pool: &PgPool, cache: &AppCache, id: Uuid) -> Result<()> {
    queries::delete_quotation(pool, id).await?;
    cache.quotations.invalidate().await;
    info!("Deleted quotation {}", id);
    Ok(())
}

/// Render the plain-text summary dated today.
///
/// The summary is built from fresh totals, so an unpriceable row is refused.
pub async fn export_quotation(pool: &PgPool, id: Uuid) -> Result<QuotationExport> {
    let loaded = load_quotation(pool, id).await?;
    let totals = match (loaded.totals, loaded.pricing_error) {
        (Some(totals), _) => totals,
        (None, Some(e)) => return Err(e.into()),
        (None, None) => return Err(AppError::Internal("quotation has no totals".to_string())),
    };
    let today = Utc::now().date_naive();
    Ok(render_export(&loaded.row, &totals, today)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::test_support::sample_row;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn draft(body: serde_json::Value) -> QuotationDraftRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_calculate_draft() {
        let totals = calculate(&draft(json!({
            "pax": 20,
            "free_places": 2,
            "markup_amount": "360",
            "cost_items": [
                { "description": "Ferry", "pricePerUnit": 45, "quantityRequired": 22, "daysRequired": 1 },
                { "description": "Hostel", "pricePerUnit": "28.50", "quantityRequired": 22, "daysRequired": 3 }
            ]
        })))
        .unwrap();

        assert_eq!(totals.total_cost, dec!(2871));
        assert_eq!(totals.net_total, dec!(3231));
        assert_eq!(totals.chargeable_pax, 18);
        assert_eq!(totals.price_per_person, dec!(179.5));
        assert_eq!(totals.profit_per_head, dec!(20));
    }

    #[test]
    fn test_calculate_reports_bad_line() {
        let err = calculate(&draft(json!({
            "pax": 10,
            "cost_items": [
                { "description": "Coach", "pricePerUnit": 900, "quantityRequired": 1, "daysRequired": 1 },
                { "description": "Museum", "pricePerUnit": -5, "quantityRequired": 10, "daysRequired": 1 }
            ]
        })))
        .unwrap_err();

        match err {
            PricingError::InvalidCostItem { index, field, .. } => {
                assert_eq!(index, 1);
                assert_eq!(field, "pricePerUnit");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_calculate_rejects_all_free_group() {
        let err = calculate(&draft(json!({ "pax": 12, "free_places": 12 }))).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidGroupComposition {
                pax: 12,
                free_places: 12
            }
        );
    }

    #[test]
    fn test_save_request_validation_precedes_pricing() {
        let request: SaveQuotationRequest = serde_json::from_value(json!({
            "school_name": "  ",
            "destination": "Berlin",
            "pax": 1,
            "free_places": 1
        }))
        .unwrap();

        match validated_totals(&request) {
            Err(AppError::BadRequest(message)) => assert!(message.contains("school_name")),
            other => panic!("unexpected result: {:?}", other.map(|t| t.net_total)),
        }
    }

    // ==================== recompute tests ====================

    #[test]
    fn test_recompute_reports_subtotal_mismatch() {
        let mut row = sample_row();
        row.markup_amount = dec!(280);
        row.cost_items = json!([
            { "description": "Coach", "pricePerUnit": "900", "quantityRequired": 1, "daysRequired": 2, "subtotal": "1500" },
            { "description": "Hostel", "pricePerUnit": "30", "quantityRequired": 30, "daysRequired": 4, "subtotal": "3600" }
        ]);

        let loaded = recompute(row);
        let totals = loaded.totals.unwrap();
        assert_eq!(totals.total_cost, dec!(5400));
        assert_eq!(totals.net_total, dec!(5680));
        assert!(loaded.pricing_error.is_none());
        assert_eq!(loaded.integrity_warnings.len(), 1);
        assert_eq!(loaded.integrity_warnings[0].index, 0);
        assert_eq!(loaded.integrity_warnings[0].recomputed, dec!(1800));
    }

    #[test]
    fn test_recompute_keeps_unpriceable_row() {
        let mut row = sample_row();
        row.pax = 0;
        row.free_places = 0;

        let loaded = recompute(row);
        assert_eq!(loaded.row.school_name, "St Mary's");
        assert!(loaded.totals.is_none());
        assert_eq!(
            loaded.pricing_error,
            Some(PricingError::InvalidGroupComposition {
                pax: 0,
                free_places: 0
            })
        );
    }

    #[test]
    fn test_recompute_keeps_row_with_bad_cost_items() {
        let mut row = sample_row();
        row.cost_items = json!({ "not": "a list" });

        let loaded = recompute(row);
        assert!(loaded.totals.is_none());
        assert!(matches!(
            loaded.pricing_error,
            Some(PricingError::InvalidCostItem { index: 0, .. })
        ));
    }
}
