//! School models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::require_text;

/// School from the schools table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postcode: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub contact_person: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable school fields
#[derive(Debug, Clone, Deserialize)]
pub struct SchoolInput {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SchoolInput {
    pub fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)?;
        require_text("email", &self.email)
    }
}
