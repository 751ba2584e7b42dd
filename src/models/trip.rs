//! Trip models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{require_non_negative, require_non_negative_amount, require_text};

/// Trip from the trips table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trip {
    pub id: Uuid,
    pub title: String,
    pub destination: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub base_price: Decimal,
    pub max_participants: i32,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub itinerary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a trip sits relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TripTiming {
    Upcoming,
    InProgress,
    Past,
}

impl Trip {
    pub fn timing(&self, today: NaiveDate) -> TripTiming {
        if self.departure_date > today {
            TripTiming::Upcoming
        } else if self.return_date < today {
            TripTiming::Past
        } else {
            TripTiming::InProgress
        }
    }
}

/// Editable trip fields
#[derive(Debug, Clone, Deserialize)]
pub struct TripInput {
    pub title: String,
    pub destination: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_days: i32,
    pub base_price: Decimal,
    pub max_participants: i32,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    #[serde(default)]
    pub itinerary: Option<String>,
}

impl TripInput {
    pub fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title)?;
        require_text("destination", &self.destination)?;
        require_non_negative("duration_days", self.duration_days)?;
        require_non_negative("max_participants", self.max_participants)?;
        require_non_negative_amount("base_price", self.base_price)?;
        if self.return_date < self.departure_date {
            return Err("return_date must not be before departure_date".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_input() -> TripInput {
        TripInput {
            title: "Paris Art Week".to_string(),
            destination: "Paris".to_string(),
            description: None,
            duration_days: 5,
            base_price: dec!(649),
            max_participants: 45,
            departure_date: date(2026, 3, 10),
            return_date: date(2026, 3, 14),
            itinerary: None,
        }
    }

    #[test]
    fn test_trip_input_validation() {
        assert!(sample_input().validate().is_ok());

        let mut input = sample_input();
        input.return_date = date(2026, 3, 9);
        assert!(input.validate().unwrap_err().contains("return_date"));

        let mut input = sample_input();
        input.base_price = dec!(-1);
        assert_eq!(input.validate().unwrap_err(), "base_price must not be negative");
    }

    #[test]
    fn test_trip_timing() {
        let input = sample_input();
        let trip = Trip {
            id: Uuid::new_v4(),
            title: input.title,
            destination: input.destination,
            description: None,
            duration_days: 5,
            base_price: input.base_price,
            max_participants: 45,
            departure_date: input.departure_date,
            return_date: input.return_date,
            itinerary: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(trip.timing(date(2026, 3, 1)), TripTiming::Upcoming);
        assert_eq!(trip.timing(date(2026, 3, 10)), TripTiming::InProgress);
        assert_eq!(trip.timing(date(2026, 3, 14)), TripTiming::InProgress);
        assert_eq!(trip.timing(date(2026, 3, 15)), TripTiming::Past);
    }
}
