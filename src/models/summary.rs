//! Derived figures shown next to schools, trips, suppliers and bookings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{checked_sum, Booking, BookingExcursion, Excursion, Trip, TripTiming};

/// Booking totals for one school
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolSummary {
    pub booking_count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_revenue: Decimal,
    pub total_participants: i64,
}

impl SchoolSummary {
    /// `None` when the revenue total overflows.
    pub fn from_bookings(bookings: &[Booking]) -> Option<Self> {
        Some(Self {
            booking_count: bookings.len(),
            total_revenue: checked_sum(bookings.iter().map(|b| b.total_price))?,
            total_participants: bookings.iter().map(|b| i64::from(b.participant_count)).sum(),
        })
    }
}

/// Booking and excursion totals for one trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripSummary {
    pub booking_count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_revenue: Decimal,
    pub total_participants: i64,
    pub excursion_count: usize,
    pub timing: TripTiming,
}

impl TripSummary {
    pub fn new(
        trip: &Trip,
        bookings: &[Booking],
        excursions: &[Excursion],
        today: NaiveDate,
    ) -> Option<Self> {
        let bookings_only = SchoolSummary::from_bookings(bookings)?;
        Some(Self {
            booking_count: bookings_only.booking_count,
            total_revenue: bookings_only.total_revenue,
            total_participants: bookings_only.total_participants,
            excursion_count: excursions.len(),
            timing: trip.timing(today),
        })
    }
}

/// Excursions offered by one supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierSummary {
    pub excursion_count: usize,
}

impl SupplierSummary {
    pub fn from_excursions(excursions: &[Excursion]) -> Self {
        Self {
            excursion_count: excursions.len(),
        }
    }
}

/// Excursion spend attached to one booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub excursion_count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub excursions_total: Decimal,
}

impl BookingSummary {
    pub fn from_excursions(excursions: &[BookingExcursion]) -> Option<Self> {
        Some(Self {
            excursion_count: excursions.len(),
            excursions_total: checked_sum(excursions.iter().map(|e| e.total_price))?,
        })
    }
}
