//! School year model
//!
//! A school year is a labelled year range ("2024-2025") with an active
//! flag. Deactivation is refused while any active enrollment link still
//! references it; that check lives in the school year service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SchoolYearId;

/// A school year available for enrollment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolYear {
    /// Unique identifier
    pub id: SchoolYearId,

    /// Year range label, e.g. "2024-2025"
    pub label: String,

    /// Whether this school year is open for enrollment
    pub active: bool,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl SchoolYear {
    /// Create a new active school year
    pub fn new(label: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SchoolYearId::new(),
            label: label.into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Deactivate this school year
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivate this school year
    pub fn reactivate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Validate the label format ("YYYY-YYYY", consecutive years)
    pub fn validate(&self) -> Result<(), String> {
        let parts: Vec<&str> = self.label.split('-').collect();
        if parts.len() != 2 {
            return Err(format!("Invalid school year label: {}", self.label));
        }
        let start: i32 = parts[0]
            .parse()
            .map_err(|_| format!("Invalid school year label: {}", self.label))?;
        let end: i32 = parts[1]
            .parse()
            .map_err(|_| format!("Invalid school year label: {}", self.label))?;
        if end != start + 1 {
            return Err(format!(
                "School year must span consecutive years: {}",
                self.label
            ));
        }
        Ok(())
    }
}

impl fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
