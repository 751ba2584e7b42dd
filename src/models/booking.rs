//! Booking models

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{require_non_negative, require_non_negative_amount, require_text};

/// Sales pipeline stage of a booking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Enquiry,
    Quoted,
    QuoteFollowUp,
    QuoteLost,
    Confirmed,
    Paid,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 8] = [
        BookingStatus::Enquiry,
        BookingStatus::Quoted,
        BookingStatus::QuoteFollowUp,
        BookingStatus::QuoteLost,
        BookingStatus::Confirmed,
        BookingStatus::Paid,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Enquiry => "enquiry",
            BookingStatus::Quoted => "quoted",
            BookingStatus::QuoteFollowUp => "quote_follow_up",
            BookingStatus::QuoteLost => "quote_lost",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Paid => "paid",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Enquiry => "Enquiry",
            BookingStatus::Quoted => "Quoted",
            BookingStatus::QuoteFollowUp => "Quote Follow Up",
            BookingStatus::QuoteLost => "Quote Lost",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Paid => "Paid",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown booking status '{}'", s))
    }
}

/// Where the excursion provider is in the booking process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    #[default]
    NotContacted,
    Contacted,
    Booked,
    Paid,
}

impl ProviderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::NotContacted => "not_contacted",
            ProviderStatus::Contacted => "contacted",
            ProviderStatus::Booked => "booked",
            ProviderStatus::Paid => "paid",
        }
    }
}

/// Booking from the bookings table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub school_id: Uuid,
    pub trip_id: Uuid,
    pub status: String,
    pub participant_count: i32,
    pub free_pax: Option<i32>,
    pub total_price: Decimal,
    pub special_requirements: Option<String>,
    pub contact_email: String,
    pub contact_phone: String,
    pub notes: Option<String>,
    pub contact_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Display label, falling back to the raw column value.
    pub fn status_label(&self) -> String {
        self.status
            .parse::<BookingStatus>()
            .map(|status| status.label().to_string())
            .unwrap_or_else(|_| self.status.clone())
    }
}

/// Excursion attached to a booking, from booking_excursions
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingExcursion {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub excursion_id: Uuid,
    pub participant_count: i32,
    pub total_price: Decimal,
    pub provider_status: String,
    pub provider_notes: Option<String>,
    pub provider_contact_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable booking fields
#[derive(Debug, Clone, Deserialize)]
pub struct BookingInput {
    pub school_id: Uuid,
    pub trip_id: Uuid,
    #[serde(default)]
    pub status: BookingStatus,
    pub participant_count: i32,
    #[serde(default)]
    pub free_pax: Option<i32>,
    pub total_price: Decimal,
    #[serde(default)]
    pub special_requirements: Option<String>,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
}

impl BookingInput {
    pub fn validate(&self) -> Result<(), String> {
        require_text("contact_email", &self.contact_email)?;
        require_non_negative("participant_count", self.participant_count)?;
        require_non_negative_amount("total_price", self.total_price)?;
        if let Some(free) = self.free_pax {
            require_non_negative("free_pax", free)?;
            if free > self.participant_count {
                return Err("free_pax must not exceed participant_count".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booking_status_strings() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
        assert_eq!(BookingStatus::QuoteFollowUp.label(), "Quote Follow Up");
        assert_eq!(
            serde_json::to_value(BookingStatus::QuoteLost).unwrap(),
            json!("quote_lost")
        );
        assert!("archived".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_provider_status_default() {
        assert_eq!(ProviderStatus::default().as_str(), "not_contacted");
        let parsed: ProviderStatus = serde_json::from_value(json!("booked")).unwrap();
        assert_eq!(parsed, ProviderStatus::Booked);
    }

    #[test]
    fn test_booking_input_validation() {
        let input: BookingInput = serde_json::from_value(json!({
            "school_id": Uuid::nil(),
            "trip_id": Uuid::nil(),
            "participant_count": 30,
            "free_pax": 3,
            "total_price": "19470.00",
            "contact_email": "trips@oakwood.sch.uk"
        }))
        .unwrap();
        assert_eq!(input.status, BookingStatus::Enquiry);
        assert!(input.validate().is_ok());

        let mut bad = input.clone();
        bad.free_pax = Some(31);
        assert!(bad.validate().unwrap_err().contains("free_pax"));
    }
}
