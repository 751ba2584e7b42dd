//! Shared fixtures for pricing tests.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use super::models::QuotationRow;

/// A stored draft for 30 pupils (2 free) on a 5-day Paris trip.
pub(crate) fn sample_row() -> QuotationRow {
    QuotationRow {
        id: Uuid::nil(),
        school_name: "St Mary's".to_string(),
        party_leader: None,
        destination: "Paris".to_string(),
        accommodation: None,
        board: None,
        date_out_uk: NaiveDate::from_ymd_opt(2026, 3, 10),
        date_back_uk: NaiveDate::from_ymd_opt(2026, 3, 14),
        number_of_days: 5,
        number_of_nights: 4,
        pax: 30,
        free_places: 2,
        exchange_rate: Decimal::ONE,
        markup_amount: Decimal::ZERO,
        total_cost: Decimal::ZERO,
        net_total: Decimal::ZERO,
        profit: Decimal::ZERO,
        price_per_person: Decimal::ZERO,
        profit_per_head: Decimal::ZERO,
        ist_staff_qty: 2,
        cost_items: json!([]),
        status: "draft".to_string(),
        valid_until: None,
        user_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
