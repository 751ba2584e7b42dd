//! Quotation models.
//!
//! `QuotationRow` uses sqlx's FromRow derive for direct database
//! deserialization. The remaining types are the strongly typed inputs and
//! outputs of the pricing engine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Quotation from the quotations table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuotationRow {
    pub id: Uuid,
    pub school_name: String,
    pub party_leader: Option<String>,
    pub destination: String,
    pub accommodation: Option<String>,
    pub board: Option<String>,
    pub date_out_uk: Option<NaiveDate>,
    pub date_back_uk: Option<NaiveDate>,
    pub number_of_days: i32,
    pub number_of_nights: i32,
    pub pax: i32,
    pub free_places: i32,
    pub exchange_rate: Decimal,
    pub markup_amount: Decimal,
    pub total_cost: Decimal,
    pub net_total: Decimal,
    pub profit: Decimal,
    pub price_per_person: Decimal,
    pub profit_per_head: Decimal,
    pub ist_staff_qty: i32,
    pub cost_items: serde_json::Value,
    pub status: String,
    pub valid_until: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuotationRow {
    pub fn group(&self) -> GroupFacts {
        GroupFacts {
            pax: self.pax,
            free_places: self.free_places,
            ist_staff_qty: self.ist_staff_qty,
            number_of_days: self.number_of_days,
            number_of_nights: self.number_of_nights,
        }
    }

    /// Case-insensitive match on school name or destination.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.school_name.to_lowercase().contains(&term)
            || self.destination.to_lowercase().contains(&term)
    }
}

/// Informational lifecycle label. Never gates recomputation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "draft",
            QuotationStatus::Sent => "sent",
            QuotationStatus::Accepted => "accepted",
            QuotationStatus::Rejected => "rejected",
            QuotationStatus::Expired => "expired",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "Draft",
            QuotationStatus::Sent => "Sent",
            QuotationStatus::Accepted => "Accepted",
            QuotationStatus::Rejected => "Rejected",
            QuotationStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuotationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(QuotationStatus::Draft),
            "sent" => Ok(QuotationStatus::Sent),
            "accepted" => Ok(QuotationStatus::Accepted),
            "rejected" => Ok(QuotationStatus::Rejected),
            "expired" => Ok(QuotationStatus::Expired),
            other => Err(format!("unknown quotation status '{}'", other)),
        }
    }
}

/// One priced line of a quotation, inputs only.
///
/// The subtotal is never stored on this type; it is always derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostItem {
    pub id: Option<String>,
    pub description: String,
    pub price_per_unit: Decimal,
    pub quantity_required: i32,
    pub days_required: i32,
}

impl CostItem {
    pub fn new(description: &str, price_per_unit: Decimal, quantity: i32, days: i32) -> Self {
        Self {
            id: None,
            description: description.to_string(),
            price_per_unit,
            quantity_required: quantity,
            days_required: days,
        }
    }

    /// `price_per_unit × quantity_required × days_required`, or `None` on overflow.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price_per_unit
            .checked_mul(Decimal::from(self.quantity_required))?
            .checked_mul(Decimal::from(self.days_required))
    }
}

/// A cost item read back from storage together with whatever subtotal was
/// persisted next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCostItem {
    pub item: CostItem,
    pub stored_subtotal: Option<Decimal>,
}

/// A cost item with its freshly derived subtotal.
///
/// This is also the shape written to the `cost_items` jsonb column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedCostItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_unit: Decimal,
    pub quantity_required: i32,
    pub days_required: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
}

/// Trip and group facts of a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFacts {
    pub pax: i32,
    #[serde(default)]
    pub free_places: i32,
    #[serde(default)]
    pub ist_staff_qty: i32,
    #[serde(default)]
    pub number_of_days: i32,
    #[serde(default)]
    pub number_of_nights: i32,
}

impl GroupFacts {
    /// Participants who pay: `pax - free_places`.
    pub fn chargeable_pax(&self) -> i32 {
        self.pax - self.free_places
    }
}

/// Everything the pricing engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationInput {
    pub group: GroupFacts,
    pub cost_items: Vec<CostItem>,
    pub markup_amount: Decimal,
    pub exchange_rate: Decimal,
}

/// Derived financial outputs of a quotation. Values are unrounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationTotals {
    pub lines: Vec<PricedCostItem>,
    pub total_cost: Decimal,
    pub markup_amount: Decimal,
    pub net_total: Decimal,
    pub chargeable_pax: i32,
    pub price_per_person: Decimal,
    pub profit: Decimal,
    pub profit_per_head: Decimal,
    pub exchange_rate: Decimal,
}

/// A stored subtotal that disagrees with its recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtotalMismatch {
    pub index: usize,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub stored: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub recomputed: Decimal,
}
