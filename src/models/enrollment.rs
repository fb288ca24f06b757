//! Enrollment link model
//!
//! An enrollment link binds a student to one school year and one fee
//! schedule, representing one billable term. At most one *active* link may
//! exist per (student, school year, semester label) slot; enforcement
//! lives in the enrollment service where the fee schedule can be joined.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EnrollmentId, FeeScheduleId, SchoolYearId, StudentId};

/// A student's enrollment for one billable term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentLink {
    /// Unique identifier
    pub id: EnrollmentId,

    /// The enrolled student
    pub student_id: StudentId,

    /// The school year enrolled for
    pub school_year_id: SchoolYearId,

    /// The fee schedule billed against
    pub fee_schedule_id: FeeScheduleId,

    /// Whether this enrollment is active (withdrawn enrollments are
    /// deactivated, never hard-deleted)
    pub active: bool,

    /// When the link was created
    pub created_at: DateTime<Utc>,

    /// When the link was last modified
    pub updated_at: DateTime<Utc>,
}

impl EnrollmentLink {
    /// Create a new active enrollment link
    pub fn new(
        student_id: StudentId,
        school_year_id: SchoolYearId,
        fee_schedule_id: FeeScheduleId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EnrollmentId::new(),
            student_id,
            school_year_id,
            fee_schedule_id,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Deactivate (withdraw) this enrollment
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivate (restore) this enrollment
    pub fn reactivate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Whether this link binds the same (student, year, schedule) triple
    pub fn same_triple(
        &self,
        student_id: StudentId,
        school_year_id: SchoolYearId,
        fee_schedule_id: FeeScheduleId,
    ) -> bool {
        self.student_id == student_id
            && self.school_year_id == school_year_id
            && self.fee_schedule_id == fee_schedule_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_link_is_active() {
        let link = EnrollmentLink::new(StudentId::new(), SchoolYearId::new(), FeeScheduleId::new());
        assert!(link.active);
    }

    #[test]
    fn test_lifecycle() {
        let mut link =
            EnrollmentLink::new(StudentId::new(), SchoolYearId::new(), FeeScheduleId::new());
        link.deactivate();
        assert!(!link.active);
        link.reactivate();
        assert!(link.active);
    }

    #[test]
    fn test_same_triple() {
        let student = StudentId::new();
        let year = SchoolYearId::new();
        let schedule = FeeScheduleId::new();
        let link = EnrollmentLink::new(student, year, schedule);

        assert!(link.same_triple(student, year, schedule));
        assert!(!link.same_triple(StudentId::new(), year, schedule));
    }
}
