//! Core quotation pricing functions.
//!
//! Pure functions for pricing math - no database access, no I/O.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::errors::PricingError;
use super::models::{
    CostItem, GroupFacts, PricedCostItem, QuotationInput, QuotationTotals, StoredCostItem,
    SubtotalMismatch,
};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use ist_trips_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Format an amount as pounds sterling for display: `£1,234.50`.
///
/// Rounding happens here and only here; stored totals stay unrounded.
pub fn format_gbp(amount: Decimal) -> String {
    let rounded = round_money(amount, 2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}£{}.{}", if negative { "-" } else { "" }, grouped, fraction)
}

/// Validate one cost item and derive its subtotal.
pub fn price_cost_item(index: usize, item: &CostItem) -> Result<PricedCostItem, PricingError> {
    if item.price_per_unit.is_sign_negative() && !item.price_per_unit.is_zero() {
        return Err(PricingError::cost_item(index, "pricePerUnit", "must not be negative"));
    }
    if item.quantity_required < 0 {
        return Err(PricingError::cost_item(index, "quantityRequired", "must not be negative"));
    }
    if item.days_required < 0 {
        return Err(PricingError::cost_item(index, "daysRequired", "must not be negative"));
    }

    let subtotal = item
        .subtotal()
        .ok_or_else(|| PricingError::overflow(format!("subtotal of line {}", index)))?;

    Ok(PricedCostItem {
        id: item.id.clone(),
        description: item.description.clone(),
        price_per_unit: item.price_per_unit,
        quantity_required: item.quantity_required,
        days_required: item.days_required,
        subtotal,
    })
}

fn validate_group(group: &GroupFacts) -> Result<i32, PricingError> {
    let invalid = group.pax < 1
        || group.free_places < 0
        || group.ist_staff_qty < 0
        || group.free_places >= group.pax;
    if invalid {
        return Err(PricingError::InvalidGroupComposition {
            pax: group.pax,
            free_places: group.free_places,
        });
    }
    Ok(group.chargeable_pax())
}

/// Calculate quotation totals from group facts and cost items.
///
/// Every subtotal is rederived from its inputs; nothing cached on the input
/// is trusted. The input is only borrowed, so calling this twice on the same
/// value yields identical totals.
pub fn compute_totals(input: &QuotationInput) -> Result<QuotationTotals, PricingError> {
    if input.exchange_rate <= Decimal::ZERO {
        return Err(PricingError::InvalidExchangeRate {
            rate: input.exchange_rate,
        });
    }
    if input.markup_amount < Decimal::ZERO {
        return Err(PricingError::InvalidMarkup {
            amount: input.markup_amount,
        });
    }

    let lines = input
        .cost_items
        .iter()
        .enumerate()
        .map(|(index, item)| price_cost_item(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    let total_cost = lines.iter().try_fold(Decimal::ZERO, |acc, line| {
        acc.checked_add(line.subtotal)
            .ok_or_else(|| PricingError::overflow("total cost"))
    })?;

    let net_total = total_cost
        .checked_add(input.markup_amount)
        .ok_or_else(|| PricingError::overflow("net total"))?;

    let chargeable_pax = validate_group(&input.group)?;
    let divisor = Decimal::from(chargeable_pax);

    let price_per_person = net_total
        .checked_div(divisor)
        .ok_or_else(|| PricingError::overflow("price per person"))?;

    // Cost items pass through at cost, so the markup is the whole profit.
    let profit = input.markup_amount;
    let profit_per_head = profit
        .checked_div(divisor)
        .ok_or_else(|| PricingError::overflow("profit per head"))?;

    Ok(QuotationTotals {
        lines,
        total_cost,
        markup_amount: input.markup_amount,
        net_total,
        chargeable_pax,
        price_per_person,
        profit,
        profit_per_head,
        exchange_rate: input.exchange_rate,
    })
}

/// Compare persisted subtotals against their recomputation.
///
/// Lines without a stored subtotal, or whose recomputation overflows, are
/// skipped here; `compute_totals` reports the latter.
pub fn find_subtotal_mismatches(items: &[StoredCostItem]) -> Vec<SubtotalMismatch> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, stored)| {
            let persisted = stored.stored_subtotal?;
            let recomputed = stored.item.subtotal()?;
            (persisted != recomputed).then(|| SubtotalMismatch {
                index,
                description: stored.item.description.clone(),
                stored: persisted,
                recomputed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn group(pax: i32, free_places: i32) -> GroupFacts {
        GroupFacts {
            pax,
            free_places,
            ist_staff_qty: 2,
            number_of_days: 5,
            number_of_nights: 4,
        }
    }

    fn input(pax: i32, free_places: i32, markup: Decimal, items: Vec<CostItem>) -> QuotationInput {
        QuotationInput {
            group: group(pax, free_places),
            cost_items: items,
            markup_amount: markup,
            exchange_rate: Decimal::ONE,
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(4.5), 0), dec!(4));
        assert_eq!(round_money(dec!(5.5), 0), dec!(6));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(35.714285714), 2), dec!(35.71));
        assert_eq!(round_money(dec!(17.857142857), 2), dec!(17.86));
    }

    // ==================== format_gbp tests ====================

    #[test]
    fn test_format_gbp() {
        assert_eq!(format_gbp(dec!(0)), "£0.00");
        assert_eq!(format_gbp(dec!(35.714285)), "£35.71");
        assert_eq!(format_gbp(dec!(999)), "£999.00");
        assert_eq!(format_gbp(dec!(1000)), "£1,000.00");
        assert_eq!(format_gbp(dec!(1234567.891)), "£1,234,567.89");
        assert_eq!(format_gbp(dec!(-1500.5)), "-£1,500.50");
    }

    // ==================== price_cost_item tests ====================

    #[test]
    fn test_subtotal_is_exact_product() {
        let cases = [
            (dec!(100), 1, 5, dec!(500)),
            (dec!(0.1), 3, 1, dec!(0.3)),
            (dec!(19.99), 7, 3, dec!(419.79)),
            (dec!(0), 40, 5, dec!(0)),
            (dec!(250), 0, 5, dec!(0)),
        ];
        for (price, qty, days, expected) in cases {
            let line = price_cost_item(0, &CostItem::new("line", price, qty, days)).unwrap();
            assert_eq!(line.subtotal, expected);
        }
    }

    #[test]
    fn test_negative_fields_rejected_per_line() {
        let err = price_cost_item(3, &CostItem::new("bad", dec!(-1), 1, 1)).unwrap_err();
        assert_eq!(err, PricingError::cost_item(3, "pricePerUnit", "must not be negative"));

        let err = price_cost_item(0, &CostItem::new("bad", dec!(1), -1, 1)).unwrap_err();
        assert!(matches!(err, PricingError::InvalidCostItem { ref field, .. } if field == "quantityRequired"));

        let err = price_cost_item(0, &CostItem::new("bad", dec!(1), 1, -2)).unwrap_err();
        assert!(matches!(err, PricingError::InvalidCostItem { ref field, .. } if field == "daysRequired"));
    }

    // ==================== compute_totals tests ====================

    #[test]
    fn test_scenario_single_line_with_markup() {
        let totals = compute_totals(&input(
            30,
            2,
            dec!(500),
            vec![CostItem::new("Hotel", dec!(100), 1, 5)],
        ))
        .unwrap();

        assert_eq!(totals.total_cost, dec!(500));
        assert_eq!(totals.net_total, dec!(1000));
        assert_eq!(totals.chargeable_pax, 28);
        assert_eq!(round_money(totals.price_per_person, 2), dec!(35.71));
        assert_eq!(totals.profit, dec!(500));
        assert_eq!(round_money(totals.profit_per_head, 2), dec!(17.86));
    }

    #[test]
    fn test_totals_are_not_rounded() {
        let totals = compute_totals(&input(
            30,
            2,
            dec!(500),
            vec![CostItem::new("Hotel", dec!(100), 1, 5)],
        ))
        .unwrap();
        assert_ne!(totals.price_per_person, dec!(35.71));
        assert_eq!(totals.price_per_person, dec!(1000) / dec!(28));
    }

    #[test]
    fn test_all_places_free_is_rejected() {
        let err = compute_totals(&input(10, 10, dec!(0), vec![])).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidGroupComposition {
                pax: 10,
                free_places: 10
            }
        );
    }

    #[test]
    fn test_more_free_places_than_pax_is_rejected() {
        let err = compute_totals(&input(10, 12, dec!(0), vec![])).unwrap_err();
        assert!(matches!(err, PricingError::InvalidGroupComposition { .. }));
    }

    #[test]
    fn test_zero_pax_is_rejected() {
        let err = compute_totals(&input(0, 0, dec!(0), vec![])).unwrap_err();
        assert!(matches!(err, PricingError::InvalidGroupComposition { pax: 0, .. }));
    }

    #[test]
    fn test_negative_staff_is_rejected() {
        let mut request = input(10, 0, dec!(0), vec![]);
        request.group.ist_staff_qty = -1;
        assert!(matches!(
            compute_totals(&request),
            Err(PricingError::InvalidGroupComposition { .. })
        ));
    }

    #[test]
    fn test_empty_quotation_is_all_zero() {
        let totals = compute_totals(&input(20, 0, dec!(0), vec![])).unwrap();
        assert!(totals.lines.is_empty());
        assert_eq!(totals.total_cost, dec!(0));
        assert_eq!(totals.net_total, dec!(0));
        assert_eq!(totals.price_per_person, dec!(0));
        assert_eq!(totals.profit_per_head, dec!(0));
    }

    #[test]
    fn test_total_cost_independent_of_line_order() {
        let a = CostItem::new("Coach", dec!(50), 2, 3);
        let b = CostItem::new("Museum", dec!(20), 1, 10);

        let forward = compute_totals(&input(12, 1, dec!(0), vec![a.clone(), b.clone()])).unwrap();
        let reverse = compute_totals(&input(12, 1, dec!(0), vec![b, a])).unwrap();

        assert_eq!(forward.lines[0].subtotal, dec!(300));
        assert_eq!(forward.lines[1].subtotal, dec!(200));
        assert_eq!(forward.total_cost, dec!(500));
        assert_eq!(reverse.total_cost, dec!(500));
        assert_eq!(forward.price_per_person, reverse.price_per_person);
    }

    #[test]
    fn test_price_per_person_formula() {
        let items = vec![
            CostItem::new("Flights", dec!(189.99), 44, 1),
            CostItem::new("Hotel", dec!(42.50), 22, 4),
            CostItem::new("Guide", dec!(120), 1, 5),
        ];
        let totals = compute_totals(&input(44, 4, dec!(1750.25), items)).unwrap();

        let expected_cost = dec!(189.99) * dec!(44) + dec!(42.50) * dec!(22) * dec!(4) + dec!(600);
        assert_eq!(totals.total_cost, expected_cost);
        assert_eq!(totals.net_total, expected_cost + dec!(1750.25));
        assert_eq!(totals.price_per_person, (expected_cost + dec!(1750.25)) / dec!(40));
        assert_eq!(totals.profit, dec!(1750.25));
    }

    #[test]
    fn test_compute_totals_is_idempotent() {
        let request = input(
            25,
            3,
            dec!(333.33),
            vec![
                CostItem::new("Ferry", dec!(12.34), 25, 2),
                CostItem::new("Insurance", dec!(7.5), 25, 1),
            ],
        );
        let snapshot = request.clone();

        let first = compute_totals(&request).unwrap();
        let second = compute_totals(&request).unwrap();

        assert_eq!(first, second);
        assert_eq!(request, snapshot);
    }

    #[test]
    fn test_invalid_exchange_rate() {
        let mut request = input(10, 0, dec!(0), vec![]);
        request.exchange_rate = dec!(0);
        assert_eq!(
            compute_totals(&request),
            Err(PricingError::InvalidExchangeRate { rate: dec!(0) })
        );

        request.exchange_rate = dec!(-1.2);
        assert!(matches!(
            compute_totals(&request),
            Err(PricingError::InvalidExchangeRate { .. })
        ));
    }

    #[test]
    fn test_exchange_rate_is_echoed() {
        let mut request = input(10, 0, dec!(100), vec![]);
        request.exchange_rate = dec!(1.17);
        let totals = compute_totals(&request).unwrap();
        assert_eq!(totals.exchange_rate, dec!(1.17));
        assert_eq!(totals.net_total, dec!(100));
    }

    #[test]
    fn test_negative_markup_rejected() {
        let err = compute_totals(&input(10, 0, dec!(-5), vec![])).unwrap_err();
        assert_eq!(err, PricingError::InvalidMarkup { amount: dec!(-5) });
    }

    #[test]
    fn test_bad_line_reports_its_index() {
        let items = vec![
            CostItem::new("ok", dec!(10), 1, 1),
            CostItem::new("bad", dec!(10), 1, -1),
        ];
        let err = compute_totals(&input(10, 0, dec!(0), items)).unwrap_err();
        assert!(matches!(err, PricingError::InvalidCostItem { index: 1, .. }));
    }

    #[test]
    fn test_overflow_is_an_error_not_a_panic() {
        let items = vec![
            CostItem::new("a", Decimal::MAX, 1, 1),
            CostItem::new("b", Decimal::MAX, 1, 1),
        ];
        let err = compute_totals(&input(10, 0, dec!(0), items)).unwrap_err();
        assert!(matches!(err, PricingError::AmountOverflow { .. }));
    }

    // ==================== find_subtotal_mismatches tests ====================

    #[test]
    fn test_subtotal_mismatch_detection() {
        let items = vec![
            StoredCostItem {
                item: CostItem::new("Coach", dec!(50), 2, 3),
                stored_subtotal: Some(dec!(300.00)),
            },
            StoredCostItem {
                item: CostItem::new("Hotel", dec!(40), 10, 4),
                stored_subtotal: Some(dec!(1500)),
            },
            StoredCostItem {
                item: CostItem::new("Extras", dec!(5), 1, 1),
                stored_subtotal: None,
            },
        ];

        let mismatches = find_subtotal_mismatches(&items);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].index, 1);
        assert_eq!(mismatches[0].stored, dec!(1500));
        assert_eq!(mismatches[0].recomputed, dec!(1600));
    }
}
