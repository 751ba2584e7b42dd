//! Boundary parsing for cost items.
//!
//! Cost items arrive as loosely shaped JSON, both in request bodies and in the
//! `cost_items` jsonb column. They are turned into typed [`CostItem`]s here and
//! nowhere else.

use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::errors::PricingError;
use super::models::{CostItem, PricedCostItem, StoredCostItem};

/// Parse a JSON array of cost items, keeping any persisted subtotal aside.
pub fn parse_stored_cost_items(value: &Value) -> Result<Vec<StoredCostItem>, PricingError> {
    let lines = match value {
        Value::Array(lines) => lines,
        Value::Null => return Ok(vec![]),
        _ => return Err(PricingError::cost_item(0, "cost_items", "must be an array")),
    };

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| parse_line(index, line))
        .collect()
}

/// Parse a JSON array of cost items into engine inputs.
pub fn parse_cost_items(value: &Value) -> Result<Vec<CostItem>, PricingError> {
    Ok(parse_stored_cost_items(value)?
        .into_iter()
        .map(|stored| stored.item)
        .collect())
}

/// Serialize priced lines for the `cost_items` column.
pub fn to_json(lines: &[PricedCostItem]) -> Result<Value, serde_json::Error> {
    serde_json::to_value(lines)
}

fn parse_line(index: usize, line: &Value) -> Result<StoredCostItem, PricingError> {
    let fields = line
        .as_object()
        .ok_or_else(|| PricingError::cost_item(index, "item", "must be an object"))?;

    let id = match fields.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let description = fields
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    let price_per_unit = decimal_field(index, fields, "pricePerUnit")?;
    if price_per_unit < Decimal::ZERO {
        return Err(PricingError::cost_item(index, "pricePerUnit", "must not be negative"));
    }
    let quantity_required = count_field(index, fields, "quantityRequired")?;
    let days_required = count_field(index, fields, "daysRequired")?;

    // A stored subtotal is informational only; unreadable values are ignored.
    let stored_subtotal = fields.get("subtotal").and_then(|v| to_decimal(v).ok());

    Ok(StoredCostItem {
        item: CostItem {
            id,
            description,
            price_per_unit,
            quantity_required,
            days_required,
        },
        stored_subtotal,
    })
}

/// Why a JSON value could not be read as a Decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unreadable {
    NotANumber,
    OutOfRange,
}

impl Unreadable {
    fn reason(self) -> &'static str {
        match self {
            Unreadable::NotANumber => "must be a number",
            Unreadable::OutOfRange => "is out of range",
        }
    }
}

fn to_decimal(value: &Value) -> Result<Decimal, Unreadable> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(Unreadable::NotANumber),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| {
            // Finite numbers too large or too precise for a Decimal
            if text.parse::<f64>().is_ok_and(f64::is_finite) {
                Unreadable::OutOfRange
            } else {
                Unreadable::NotANumber
            }
        })
}

fn decimal_field(index: usize, fields: &Map<String, Value>, name: &str) -> Result<Decimal, PricingError> {
    let value = fields
        .get(name)
        .ok_or_else(|| PricingError::cost_item(index, name, "is missing"))?;
    to_decimal(value).map_err(|e| PricingError::cost_item(index, name, e.reason()))
}

fn count_field(index: usize, fields: &Map<String, Value>, name: &str) -> Result<i32, PricingError> {
    let value = decimal_field(index, fields, name)?;
    if value < Decimal::ZERO {
        return Err(PricingError::cost_item(index, name, "must not be negative"));
    }
    if !value.fract().is_zero() {
        return Err(PricingError::cost_item(index, name, "must be a whole number"));
    }
    value
        .to_i32()
        .ok_or_else(|| PricingError::cost_item(index, name, "is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_numbers_and_strings() {
        let value = json!([
            {"id": "a1", "description": "Coach", "pricePerUnit": 450.5, "quantityRequired": 2, "daysRequired": 3, "subtotal": 2703},
            {"description": " Hotel ", "pricePerUnit": "42.50", "quantityRequired": "20", "daysRequired": 4}
        ]);

        let items = parse_stored_cost_items(&value).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item.id.as_deref(), Some("a1"));
        assert_eq!(items[0].item.price_per_unit, dec!(450.5));
        assert_eq!(items[0].stored_subtotal, Some(dec!(2703)));
        assert_eq!(items[1].item.description, "Hotel");
        assert_eq!(items[1].item.price_per_unit, dec!(42.50));
        assert_eq!(items[1].item.quantity_required, 20);
        assert_eq!(items[1].stored_subtotal, None);
    }

    #[test]
    fn test_null_is_an_empty_list() {
        assert!(parse_cost_items(&Value::Null).unwrap().is_empty());
        assert!(parse_cost_items(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_not_an_array() {
        let err = parse_cost_items(&json!({"pricePerUnit": 1})).unwrap_err();
        assert_eq!(err, PricingError::cost_item(0, "cost_items", "must be an array"));
    }

    #[test]
    fn test_non_numeric_price() {
        let value = json!([
            {"description": "ok", "pricePerUnit": 1, "quantityRequired": 1, "daysRequired": 1},
            {"description": "bad", "pricePerUnit": "ten", "quantityRequired": 1, "daysRequired": 1}
        ]);
        let err = parse_cost_items(&value).unwrap_err();
        assert_eq!(err, PricingError::cost_item(1, "pricePerUnit", "must be a number"));
    }

    #[test]
    fn test_numbers_beyond_decimal_range() {
        let value = json!([{"pricePerUnit": "1e40", "quantityRequired": 1, "daysRequired": 1}]);
        let err = parse_cost_items(&value).unwrap_err();
        assert_eq!(err, PricingError::cost_item(0, "pricePerUnit", "is out of range"));

        let value = json!([{"pricePerUnit": "1e-30", "quantityRequired": 1, "daysRequired": 1}]);
        let err = parse_cost_items(&value).unwrap_err();
        assert_eq!(err, PricingError::cost_item(0, "pricePerUnit", "is out of range"));

        let value = json!([{"pricePerUnit": 2, "quantityRequired": "1e40", "daysRequired": 1}]);
        let err = parse_cost_items(&value).unwrap_err();
        assert_eq!(err, PricingError::cost_item(0, "quantityRequired", "is out of range"));

        let value = json!([{"pricePerUnit": "inf", "quantityRequired": 1, "daysRequired": 1}]);
        let err = parse_cost_items(&value).unwrap_err();
        assert_eq!(err, PricingError::cost_item(0, "pricePerUnit", "must be a number"));
    }

    #[test]
    fn test_missing_field() {
        let value = json!([{"description": "x", "pricePerUnit": 1, "quantityRequired": 1}]);
        let err = parse_cost_items(&value).unwrap_err();
        assert_eq!(err, PricingError::cost_item(0, "daysRequired", "is missing"));
    }

    #[test]
    fn test_negative_and_fractional_counts() {
        let value = json!([{"pricePerUnit": 1, "quantityRequired": -2, "daysRequired": 1}]);
        let err = parse_cost_items(&value).unwrap_err();
        assert_eq!(err, PricingError::cost_item(0, "quantityRequired", "must not be negative"));

        let value = json!([{"pricePerUnit": 1, "quantityRequired": 1, "daysRequired": 1.5}]);
        let err = parse_cost_items(&value).unwrap_err();
        assert_eq!(err, PricingError::cost_item(0, "daysRequired", "must be a whole number"));

        let value = json!([{"pricePerUnit": -0.01, "quantityRequired": 1, "daysRequired": 1}]);
        let err = parse_cost_items(&value).unwrap_err();
        assert_eq!(err, PricingError::cost_item(0, "pricePerUnit", "must not be negative"));
    }

    #[test]
    fn test_priced_lines_are_readable_back() {
        let lines = vec![PricedCostItem {
            id: Some("l1".to_string()),
            description: "Coach".to_string(),
            price_per_unit: dec!(50),
            quantity_required: 2,
            days_required: 3,
            subtotal: dec!(300),
        }];

        let stored = to_json(&lines).unwrap();
        assert_eq!(stored[0]["pricePerUnit"], json!("50"));
        assert_eq!(stored[0]["subtotal"], json!("300"));

        let parsed = parse_stored_cost_items(&stored).unwrap();
        assert_eq!(parsed[0].item.quantity_required, 2);
        assert_eq!(parsed[0].stored_subtotal, Some(dec!(300)));
    }
}
