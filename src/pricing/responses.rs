//! Response DTOs for quotation API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

use super::calculators::format_gbp;
use super::errors::PricingError;
use super::models::{PricedCostItem, QuotationRow, QuotationTotals, SubtotalMismatch};

pub const CURRENCY: &str = "GBP";

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    /// Rounded display form, e.g. `£1,234.50`
    pub formatted: String,
}

impl MoneyResponse {
    pub fn gbp(amount: Decimal) -> Self {
        Self {
            amount,
            currency: CURRENCY.to_string(),
            formatted: format_gbp(amount),
        }
    }
}

/// Response for a quotation totals calculation
#[derive(Debug, Clone, Serialize)]
pub struct QuotationTotalsResponse {
    pub lines: Vec<PricedCostItem>,
    pub total_cost: MoneyResponse,
    pub markup_amount: MoneyResponse,
    pub net_total: MoneyResponse,
    pub chargeable_pax: i32,
    pub price_per_person: MoneyResponse,
    pub profit: MoneyResponse,
    pub profit_per_head: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub exchange_rate: Decimal,
}

impl From<QuotationTotals> for QuotationTotalsResponse {
    fn from(totals: QuotationTotals) -> Self {
        Self {
            total_cost: MoneyResponse::gbp(totals.total_cost),
            markup_amount: MoneyResponse::gbp(totals.markup_amount),
            net_total: MoneyResponse::gbp(totals.net_total),
            chargeable_pax: totals.chargeable_pax,
            price_per_person: MoneyResponse::gbp(totals.price_per_person),
            profit: MoneyResponse::gbp(totals.profit),
            profit_per_head: MoneyResponse::gbp(totals.profit_per_head),
            exchange_rate: totals.exchange_rate,
            lines: totals.lines,
        }
    }
}

/// Response for a single stored quotation
#[derive(Debug, Serialize)]
pub struct QuotationResponse {
    pub quotation: QuotationRow,
    pub status_label: &'static str,
    pub totals: Option<QuotationTotalsResponse>,
    /// Why the stored inputs could not be priced, when `totals` is empty
    pub pricing_error: Option<PricingErrorResponse>,
    pub integrity_warnings: Vec<SubtotalMismatch>,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&PricingError> for PricingErrorResponse {
    fn from(e: &PricingError) -> Self {
        let details = match e {
            PricingError::InvalidCostItem { index, field, .. } => {
                Some(json!({ "index": index, "field": field }))
            }
            PricingError::InvalidGroupComposition { pax, free_places } => {
                Some(json!({ "pax": pax, "free_places": free_places }))
            }
            _ => None,
        };
        Self {
            error_type: e.error_type().to_string(),
            message: e.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_response_details() {
        let body = PricingErrorResponse::from(&PricingError::InvalidGroupComposition {
            pax: 0,
            free_places: 0,
        });
        assert_eq!(body.error_type, "InvalidGroupComposition");
        assert_eq!(body.details, Some(json!({ "pax": 0, "free_places": 0 })));

        let body = PricingErrorResponse::from(&PricingError::InvalidMarkup { amount: dec!(-5) });
        assert_eq!(body.error_type, "InvalidMarkup");
        assert!(body.details.is_none());
    }
}
