//! Database queries for quotations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::cost_items;
use super::models::{QuotationRow, QuotationStatus, QuotationTotals};
use super::requests::SaveQuotationRequest;

const QUOTATION_COLUMNS: &str = r#"
    id, school_name, party_leader, destination, accommodation, board,
    date_out_uk, date_back_uk, number_of_days, number_of_nights,
    pax, free_places, exchange_rate, markup_amount,
    total_cost, net_total, profit, price_per_person, profit_per_head,
    ist_staff_qty, cost_items, status, valid_until, user_id,
    created_at, updated_at
"#;

fn cost_items_json(totals: &QuotationTotals) -> Result<serde_json::Value, AppError> {
    cost_items::to_json(&totals.lines)
        .map_err(|e| AppError::Internal(format!("Failed to serialize cost items: {}", e)))
}

/// All quotations, newest first
pub async fn list_quotations(pool: &PgPool) -> Result<Vec<QuotationRow>, AppError> {
    let rows = sqlx::query_as::<_, QuotationRow>(&format!(
        "SELECT {} FROM quotations ORDER BY created_at DESC",
        QUOTATION_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get a quotation by id
pub async fn get_quotation(pool: &PgPool, id: Uuid) -> Result<QuotationRow, AppError> {
    sqlx::query_as::<_, QuotationRow>(&format!(
        "SELECT {} FROM quotations WHERE id = $1",
        QUOTATION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Insert a quotation with its freshly derived totals
pub async fn insert_quotation(
    pool: &PgPool,
    request: &SaveQuotationRequest,
    totals: &QuotationTotals,
) -> Result<QuotationRow, AppError> {
    let row = sqlx::query_as::<_, QuotationRow>(&format!(
        r#"
        INSERT INTO quotations (
            school_name, party_leader, destination, accommodation, board,
            date_out_uk, date_back_uk, number_of_days, number_of_nights,
            pax, free_places, exchange_rate, markup_amount,
            total_cost, net_total, profit, price_per_person, profit_per_head,
            ist_staff_qty, cost_items, status, valid_until, user_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
        RETURNING {}
        "#,
        QUOTATION_COLUMNS
    ))
    .bind(request.school_name.trim())
    .bind(&request.party_leader)
    .bind(request.destination.trim())
    .bind(&request.accommodation)
    .bind(&request.board)
    .bind(request.date_out_uk)
    .bind(request.date_back_uk)
    .bind(request.draft.number_of_days)
    .bind(request.draft.number_of_nights)
    .bind(request.draft.pax)
    .bind(request.draft.free_places)
    .bind(totals.exchange_rate)
    .bind(totals.markup_amount)
    .bind(totals.total_cost)
    .bind(totals.net_total)
    .bind(totals.profit)
    .bind(totals.price_per_person)
    .bind(totals.profit_per_head)
    .bind(request.draft.ist_staff_qty)
    .bind(cost_items_json(totals)?)
    .bind(request.status.as_str())
    .bind(request.valid_until)
    .bind(request.user_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Replace every editable field of a quotation. Last write wins.
pub async fn update_quotation(
    pool: &PgPool,
    id: Uuid,
    request: &SaveQuotationRequest,
    totals: &QuotationTotals,
) -> Result<QuotationRow, AppError> {
    sqlx::query_as::<_, QuotationRow>(&format!(
        r#"
        UPDATE quotations SET
            school_name = $2, party_leader = $3, destination = $4,
            accommodation = $5, board = $6, date_out_uk = $7, date_back_uk = $8,
            number_of_days = $9, number_of_nights = $10, pax = $11, free_places = $12,
            exchange_rate = $13, markup_amount = $14, total_cost = $15, net_total = $16,
            profit = $17, price_per_person = $18, profit_per_head = $19,
            ist_staff_qty = $20, cost_items = $21, status = $22, valid_until = $23,
            updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        QUOTATION_COLUMNS
    ))
    .bind(id)
    .bind(request.school_name.trim())
    .bind(&request.party_leader)
    .bind(request.destination.trim())
    .bind(&request.accommodation)
    .bind(&request.board)
    .bind(request.date_out_uk)
    .bind(request.date_back_uk)
    .bind(request.draft.number_of_days)
    .bind(request.draft.number_of_nights)
    .bind(request.draft.pax)
    .bind(request.draft.free_places)
    .bind(totals.exchange_rate)
    .bind(totals.markup_amount)
    .bind(totals.total_cost)
    .bind(totals.net_total)
    .bind(totals.profit)
    .bind(totals.price_per_person)
    .bind(totals.profit_per_head)
    .bind(request.draft.ist_staff_qty)
    .bind(cost_items_json(totals)?)
    .bind(request.status.as_str())
    .bind(request.valid_until)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Change only the status label
pub async fn update_quotation_status(
    pool: &PgPool,
    id: Uuid,
    status: QuotationStatus,
) -> Result<QuotationRow, AppError> {
    sqlx::query_as::<_, QuotationRow>(&format!(
        "UPDATE quotations SET status = $2, updated_at = now() WHERE id = $1 RETURNING {}",
        QUOTATION_COLUMNS
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Hard delete. There is no soft-delete or undo.
pub async fn delete_quotation(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
