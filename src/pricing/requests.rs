//! Request DTOs for quotation API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::cost_items::parse_cost_items;
use super::errors::PricingError;
use super::models::{GroupFacts, QuotationInput, QuotationStatus};

fn default_exchange_rate() -> Decimal {
    Decimal::ONE
}

/// The pricing-relevant part of a quotation, as posted by the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotationDraftRequest {
    pub pax: i32,
    #[serde(default)]
    pub free_places: i32,
    #[serde(default)]
    pub ist_staff_qty: i32,
    #[serde(default)]
    pub number_of_days: i32,
    #[serde(default)]
    pub number_of_nights: i32,
    /// Left untyped so each line can be validated with its own index.
    #[serde(default)]
    pub cost_items: serde_json::Value,
    #[serde(default)]
    pub markup_amount: Decimal,
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: Decimal,
}

impl QuotationDraftRequest {
    pub fn group(&self) -> GroupFacts {
        GroupFacts {
            pax: self.pax,
            free_places: self.free_places,
            ist_staff_qty: self.ist_staff_qty,
            number_of_days: self.number_of_days,
            number_of_nights: self.number_of_nights,
        }
    }

    /// Validate the cost items and build the engine input.
    pub fn to_input(&self) -> Result<QuotationInput, PricingError> {
        Ok(QuotationInput {
            group: self.group(),
            cost_items: parse_cost_items(&self.cost_items)?,
            markup_amount: self.markup_amount,
            exchange_rate: self.exchange_rate,
        })
    }
}

/// Request to create or fully replace a quotation.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveQuotationRequest {
    pub school_name: String,
    #[serde(default)]
    pub party_leader: Option<String>,
    pub destination: String,
    #[serde(default)]
    pub accommodation: Option<String>,
    #[serde(default)]
    pub board: Option<String>,
    #[serde(default)]
    pub date_out_uk: Option<NaiveDate>,
    #[serde(default)]
    pub date_back_uk: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub status: QuotationStatus,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(flatten)]
    pub draft: QuotationDraftRequest,
}

impl SaveQuotationRequest {
    /// Field checks that sit outside the pricing engine.
    pub fn validate(&self) -> Result<(), String> {
        if self.school_name.trim().is_empty() {
            return Err("school_name is required".to_string());
        }
        if self.destination.trim().is_empty() {
            return Err("destination is required".to_string());
        }
        if self.draft.number_of_days < 0 || self.draft.number_of_nights < 0 {
            return Err("number_of_days and number_of_nights must not be negative".to_string());
        }
        if let (Some(out), Some(back)) = (self.date_out_uk, self.date_back_uk) {
            if back < out {
                return Err("date_back_uk must not be before date_out_uk".to_string());
            }
        }
        Ok(())
    }
}

/// Request to change only the status label.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: QuotationStatus,
}

/// Query parameters for the quotation list
#[derive(Debug, Default, Deserialize)]
pub struct QuotationListQuery {
    #[serde(default)]
    pub search: Option<String>,
}
