//! Plain-text quotation summary for download.

use askama::Template;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calculators::format_gbp;
use super::models::{QuotationRow, QuotationTotals};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Template)]
#[template(path = "quotation_export.txt")]
struct QuotationExportTemplate<'a> {
    school_name: &'a str,
    party_leader: &'a str,
    destination: &'a str,
    accommodation: &'a str,
    board: &'a str,
    departure: String,
    return_date: String,
    number_of_days: i32,
    number_of_nights: i32,
    pax: i32,
    free_places: i32,
    ist_staff_qty: i32,
    total_cost: String,
    markup: String,
    net_total: String,
    price_per_person: String,
    profit: String,
    breakdown: Vec<String>,
    valid_until: String,
    generated_on: String,
}

/// A rendered export ready to be served as an attachment.
#[derive(Debug, Clone)]
pub struct QuotationExport {
    pub filename: String,
    pub body: String,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn or_na(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

/// `quotation-<school-name>-<yyyy-mm-dd>.txt`
pub fn export_filename(school_name: &str, generated_on: NaiveDate) -> String {
    let slug = school_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("quotation-{}-{}.txt", slug, generated_on.format("%Y-%m-%d"))
}

/// Render the export from a stored quotation and freshly computed totals.
///
/// Only lines with a positive subtotal are listed in the breakdown.
pub fn render_export(
    quotation: &QuotationRow,
    totals: &QuotationTotals,
    generated_on: NaiveDate,
) -> Result<QuotationExport, askama::Error> {
    let breakdown = totals
        .lines
        .iter()
        .filter(|line| line.subtotal > Decimal::ZERO)
        .map(|line| format!("{}: {}", line.description, format_gbp(line.subtotal)))
        .collect();

    let template = QuotationExportTemplate {
        school_name: &quotation.school_name,
        party_leader: or_na(&quotation.party_leader),
        destination: &quotation.destination,
        accommodation: or_na(&quotation.accommodation),
        board: or_na(&quotation.board),
        departure: quotation
            .date_out_uk
            .map(format_date)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        return_date: quotation
            .date_back_uk
            .map(format_date)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        number_of_days: quotation.number_of_days,
        number_of_nights: quotation.number_of_nights,
        pax: quotation.pax,
        free_places: quotation.free_places,
        ist_staff_qty: quotation.ist_staff_qty,
        total_cost: format_gbp(totals.total_cost),
        markup: format_gbp(totals.markup_amount),
        net_total: format_gbp(totals.net_total),
        price_per_person: format_gbp(totals.price_per_person),
        profit: format_gbp(totals.profit),
        breakdown,
        valid_until: quotation
            .valid_until
            .map(format_date)
            .unwrap_or_else(|| "No expiry".to_string()),
        generated_on: format_date(generated_on),
    };

    Ok(QuotationExport {
        filename: export_filename(&quotation.school_name, generated_on),
        body: template.render()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::compute_totals;
    use crate::pricing::models::{CostItem, QuotationInput};
    use crate::pricing::test_support::sample_row;
    use rust_decimal_macros::dec;

    fn totals() -> QuotationTotals {
        compute_totals(&QuotationInput {
            group: sample_row().group(),
            cost_items: vec![
                CostItem::new("Hotel", dec!(100), 1, 5),
                CostItem::new("Unused extra", dec!(0), 1, 1),
                CostItem::new("Coach hire", dec!(1250), 1, 1),
            ],
            markup_amount: dec!(500),
            exchange_rate: dec!(1),
        })
        .unwrap()
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(
            export_filename("St  Mary's High School", date),
            "quotation-st-mary's-high-school-2026-10-16.txt"
        );
    }

    #[test]
    fn test_render_export() {
        let row = sample_row();
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let export = render_export(&row, &totals(), date).unwrap();

        assert_eq!(export.filename, "quotation-st-mary's-2026-10-16.txt");
        let body = export.body;
        assert!(body.starts_with("EDUCATIONAL TOUR QUOTATION"));
        assert!(body.contains("School: St Mary's"));
        assert!(body.contains("Party Leader: N/A"));
        assert!(body.contains("Departure: 10/03/2026"));
        assert!(body.contains("Duration: 5 days, 4 nights"));
        assert!(body.contains("Free Places: 2"));
        assert!(body.contains("Total Cost: £1,750.00"));
        assert!(body.contains("Net Total: £2,250.00"));
        assert!(body.contains("Price Per Person: £80.36"));
        assert!(body.contains("Hotel: £500.00"));
        assert!(body.contains("Coach hire: £1,250.00"));
        assert!(!body.contains("Unused extra"));
        assert!(body.contains("Valid Until: No expiry"));
        assert!(body.contains("Generated on: 16/10/2026"));
    }
}
