//! Supplier models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::require_text;

/// Supplier from the suppliers table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub website: Option<String>,
    pub specialties: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub focus: Option<String>,
    pub approx_price: Option<String>,
    pub notes_for_groups: Option<String>,
    pub travel_time: Option<String>,
    pub transport_mode: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable supplier fields
#[derive(Debug, Clone, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub specialties: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub focus: Option<String>,
    /// Free text such as "£8pp", kept as entered
    #[serde(default)]
    pub approx_price: Option<String>,
    #[serde(default)]
    pub notes_for_groups: Option<String>,
    #[serde(default)]
    pub travel_time: Option<String>,
    #[serde(default)]
    pub transport_mode: Option<String>,
}

impl SupplierInput {
    pub fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)
    }
}
