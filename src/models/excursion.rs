//! Excursion models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{require_non_negative, require_non_negative_amount, require_text};

/// Excursion from the excursions table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Excursion {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub duration_hours: Option<Decimal>,
    pub max_participants: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable excursion fields
#[derive(Debug, Clone, Deserialize)]
pub struct ExcursionInput {
    pub trip_id: Uuid,
    #[serde(default)]
    pub supplier_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub duration_hours: Option<Decimal>,
    #[serde(default)]
    pub max_participants: Option<i32>,
}

impl ExcursionInput {
    pub fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)?;
        require_non_negative_amount("price", self.price)?;
        if let Some(hours) = self.duration_hours {
            require_non_negative_amount("duration_hours", hours)?;
        }
        if let Some(max) = self.max_participants {
            require_non_negative("max_participants", max)?;
        }
        Ok(())
    }
}
