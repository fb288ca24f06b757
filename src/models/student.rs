//! Student model
//!
//! A student's identity (the student number) is immutable; profile fields
//! are mutable. Students are never physically deleted, only deactivated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::StudentId;

/// A student known to the registrar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier
    pub id: StudentId,

    /// Institution-assigned student number (e.g., "2021-00042")
    pub student_number: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Middle name, if any
    #[serde(default)]
    pub middle_name: String,

    /// Degree program (e.g., "BSIT")
    #[serde(default)]
    pub program: String,

    /// Year level within the program
    #[serde(default)]
    pub year_level: String,

    /// Whether this student is active (deactivated students keep their
    /// history but cannot be enrolled)
    pub active: bool,

    /// When the student record was created
    pub created_at: DateTime<Utc>,

    /// When the student record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Create a new active student
    pub fn new(
        student_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: StudentId::new(),
            student_number: student_number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            middle_name: String::new(),
            program: String::new(),
            year_level: String::new(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name, "Last, First Middle"
    pub fn full_name(&self) -> String {
        if self.middle_name.is_empty() {
            format!("{}, {}", self.last_name, self.first_name)
        } else {
            format!("{}, {} {}", self.last_name, self.first_name, self.middle_name)
        }
    }

    /// Deactivate this student
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivate this student
    pub fn reactivate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Validate the student record
    pub fn validate(&self) -> Result<(), String> {
        if self.student_number.trim().is_empty() {
            return Err("Student number cannot be empty".into());
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("Student name cannot be empty".into());
        }
        Ok(())
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name(), self.student_number)
    }
}
