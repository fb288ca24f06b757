//! Fee schedule model
//!
//! A fee schedule holds the tuition amounts for the first, second and
//! summer terms. One schedule row is shared by every enrollment link that
//! happens to carry the same amount combination; in practice one term is
//! non-zero per row and the semester label is derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::round2;
use super::ids::FeeScheduleId;

/// The term a fee schedule (and its enrollment links) bills for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemesterLabel {
    /// First semester
    First,
    /// Second semester
    Second,
    /// Summer term
    Summer,
}

impl SemesterLabel {
    /// Parse a semester label from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "first" | "1st" | "1st sem" | "1" => Some(Self::First),
            "second" | "2nd" | "2nd sem" | "2" => Some(Self::Second),
            "summer" => Some(Self::Summer),
            _ => None,
        }
    }
}

impl fmt::Display for SemesterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "1st Sem"),
            Self::Second => write!(f, "2nd Sem"),
            Self::Summer => write!(f, "Summer"),
        }
    }
}

/// Per-term tuition amounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Unique identifier
    pub id: FeeScheduleId,

    /// First semester amount
    pub first: f64,

    /// Second semester amount
    pub second: f64,

    /// Summer term amount
    pub summer: f64,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl FeeSchedule {
    /// Create a new fee schedule with the given term amounts
    pub fn new(first: f64, second: f64, summer: f64) -> Self {
        let now = Utc::now();
        Self {
            id: FeeScheduleId::new(),
            first: round2(first),
            second: round2(second),
            summer: round2(summer),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the term amounts
    pub fn set_amounts(&mut self, first: f64, second: f64, summer: f64) {
        self.first = round2(first);
        self.second = round2(second);
        self.summer = round2(summer);
        self.updated_at = Utc::now();
    }

    /// Total amount payable across the schedule's terms
    pub fn total_payable(&self) -> f64 {
        round2(self.first + self.second + self.summer)
    }

    /// Derive the semester this schedule bills for
    ///
    /// The label is the first non-zero term in First -> Second -> Summer
    /// order; a schedule with all three amounts zero has no label.
    pub fn semester_label(&self) -> Option<SemesterLabel> {
        if self.first > 0.0 {
            Some(SemesterLabel::First)
        } else if self.second > 0.0 {
            Some(SemesterLabel::Second)
        } else if self.summer > 0.0 {
            Some(SemesterLabel::Summer)
        } else {
            None
        }
    }

    /// Whether this schedule carries exactly the given amount combination
    pub fn matches_amounts(&self, first: f64, second: f64, summer: f64) -> bool {
        self.first == round2(first) && self.second == round2(second) && self.summer == round2(summer)
    }

    /// Validate the schedule (no negative amounts)
    pub fn validate(&self) -> Result<(), String> {
        for (name, amount) in [
            ("first", self.first),
            ("second", self.second),
            ("summer", self.summer),
        ] {
            if amount < 0.0 || !amount.is_finite() {
                return Err(format!("Invalid {} semester amount: {}", name, amount));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_payable() {
        let schedule = FeeSchedule::new(50000.0, 0.0, 0.0);
        assert_eq!(schedule.total_payable(), 50000.0);

        let mixed = FeeSchedule::new(10000.0, 5000.0, 2500.0);
        assert_eq!(mixed.total_payable(), 17500.0);
    }

    #[test]
    fn test_semester_label_derivation() {
        assert_eq!(
            FeeSchedule::new(50000.0, 0.0, 0.0).semester_label(),
            Some(SemesterLabel::First)
        );
        assert_eq!(
            FeeSchedule::new(0.0, 45000.0, 0.0).semester_label(),
            Some(SemesterLabel::Second)
        );
        assert_eq!(
            FeeSchedule::new(0.0, 0.0, 12000.0).semester_label(),
            Some(SemesterLabel::Summer)
        );
        assert_eq!(FeeSchedule::new(0.0, 0.0, 0.0).semester_label(), None);
    }

    #[test]
    fn test_matches_amounts() {
        let schedule = FeeSchedule::new(50000.0, 0.0, 0.0);
        assert!(schedule.matches_amounts(50000.0, 0.0, 0.0));
        assert!(!schedule.matches_amounts(50000.0, 100.0, 0.0));
    }

    #[test]
    fn test_validation_rejects_negative() {
        let schedule = FeeSchedule::new(50000.0, 0.0, 0.0);
        assert!(schedule.validate().is_ok());

        let mut bad = FeeSchedule::new(0.0, 0.0, 0.0);
        bad.first = -1.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_semester_label_parse() {
        assert_eq!(SemesterLabel::parse("1st Sem"), Some(SemesterLabel::First));
        assert_eq!(SemesterLabel::parse("second"), Some(SemesterLabel::Second));
        assert_eq!(SemesterLabel::parse("SUMMER"), Some(SemesterLabel::Summer));
        assert_eq!(SemesterLabel::parse("winter"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SemesterLabel::First.to_string(), "1st Sem");
        assert_eq!(SemesterLabel::Summer.to_string(), "Summer");
    }
}
