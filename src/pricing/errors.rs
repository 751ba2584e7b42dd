//! Validation failures raised by the quotation pricing engine.

use rust_decimal::Decimal;

/// Pricing calculation error types.
///
/// Every variant is a value-level validation failure scoped to a single
/// quotation edit. None of them are fatal and none are retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid group composition: {pax} pax with {free_places} free places leaves no chargeable participants")]
    InvalidGroupComposition { pax: i32, free_places: i32 },

    #[error("Invalid cost item at line {index}: {field} {reason}")]
    InvalidCostItem {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("Invalid exchange rate {rate}: must be greater than zero")]
    InvalidExchangeRate { rate: Decimal },

    #[error("Invalid markup {amount}: must not be negative")]
    InvalidMarkup { amount: Decimal },

    #[error("Amount overflow while calculating {context}")]
    AmountOverflow { context: String },
}

impl PricingError {
    /// Stable machine-readable name used in API error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::InvalidGroupComposition { .. } => "InvalidGroupComposition",
            PricingError::InvalidCostItem { .. } => "InvalidCostItem",
            PricingError::InvalidExchangeRate { .. } => "InvalidExchangeRate",
            PricingError::InvalidMarkup { .. } => "InvalidMarkup",
            PricingError::AmountOverflow { .. } => "AmountOverflow",
        }
    }

    pub(crate) fn cost_item(index: usize, field: &str, reason: impl Into<String>) -> Self {
        PricingError::InvalidCostItem {
            index,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        PricingError::AmountOverflow {
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::InvalidGroupComposition {
            pax: 10,
            free_places: 10,
        };
        assert!(err.to_string().contains("10 pax"));
        assert_eq!(err.error_type(), "InvalidGroupComposition");

        let err = PricingError::cost_item(2, "pricePerUnit", "must not be negative");
        assert_eq!(
            err.to_string(),
            "Invalid cost item at line 2: pricePerUnit must not be negative"
        );

        let err = PricingError::InvalidExchangeRate { rate: dec!(0) };
        assert!(err.to_string().contains("greater than zero"));
        assert_eq!(err.error_type(), "InvalidExchangeRate");
    }
}
