//! Custom error types for the bursar ledger
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions. Validation failures on ledger
//! mutations are always surfaced to the caller and never retried, since
//! retrying a delta-based payment would double-count it.

use thiserror::Error;

/// The main error type for bursar operations
#[derive(Error, Debug)]
pub enum BursarError {
    /// Non-positive or unparsable monetary amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A payment would push the paid amount past the total payable
    #[error(
        "Payment of {attempted:.2} exceeds the total payable of {total_payable:.2}"
    )]
    ExceedsPayable { attempted: f64, total_payable: f64 },

    /// No fee schedule amounts have been set for this enrollment
    #[error("No payable defined for enrollment {enrollment}")]
    NoPayableDefined { enrollment: String },

    /// A second active enrollment link for the same student, school year
    /// and semester slot
    #[error(
        "Student {student} already has an active {semester} enrollment for {school_year} (link {existing})"
    )]
    DuplicateEnrollment {
        student: String,
        school_year: String,
        semester: String,
        existing: String,
    },

    /// School year deactivation blocked by active enrollment links
    #[error("School year {school_year} is referenced by {active_links} active enrollment(s)")]
    SchoolYearInUse {
        school_year: String,
        active_links: usize,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Encryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl BursarError {
    /// Create a "not found" error for enrollment links
    pub fn link_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Enrollment link",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for students
    pub fn student_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Student",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for school years
    pub fn school_year_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "School year",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for fee schedules
    pub fn fee_schedule_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Fee schedule",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for admins
    pub fn admin_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Admin",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BursarError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BursarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for bursar operations
pub type BursarResult<T> = Result<T, BursarError>;
