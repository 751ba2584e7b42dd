//! Directory models: schools, trips, suppliers, excursions and bookings

pub mod booking;
pub mod excursion;
pub mod school;
pub mod summary;
pub mod supplier;
pub mod trip;

use rust_decimal::Decimal;

pub use booking::{Booking, BookingExcursion, BookingInput, BookingStatus, ProviderStatus};
pub use excursion::{Excursion, ExcursionInput};
pub use school::{School, SchoolInput};
pub use summary::{BookingSummary, SchoolSummary, SupplierSummary, TripSummary};
pub use supplier::{Supplier, SupplierInput};
pub use trip::{Trip, TripInput, TripTiming};

/// Reject blank required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: i32) -> Result<(), String> {
    if value < 0 {
        return Err(format!("{} must not be negative", field));
    }
    Ok(())
}

pub(crate) fn require_non_negative_amount(field: &str, value: Decimal) -> Result<(), String> {
    if value < Decimal::ZERO {
        return Err(format!("{} must not be negative", field));
    }
    Ok(())
}

/// Exact sum of money amounts; `None` when it leaves the Decimal range.
pub(crate) fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
}

/// Trim optional text, mapping blanks to `None`.
pub(crate) fn clean_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
