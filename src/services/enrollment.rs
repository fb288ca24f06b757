//! Enrollment link registry
//!
//! Creates and manages the (student, school year, fee schedule) links that
//! each represent one billable term. Enforces the one-active-link rule per
//! (student, school year, semester label) slot at write time, and exposes
//! the bulk enroll-or-report-conflict boundary used by external ingestion
//! adapters.

use crate::error::{BursarError, BursarResult};
use crate::models::{
    EnrollmentId, EnrollmentLink, FeeSchedule, FeeScheduleId, SchoolYear, SchoolYearId,
    SemesterLabel, Student, StudentId,
};
use crate::storage::Storage;

/// Service for enrollment link management
pub struct EnrollmentService<'a> {
    storage: &'a Storage,
}

/// One row of an external ingestion batch (e.g. a spreadsheet import)
#[derive(Debug, Clone)]
pub struct EnrollmentEntry {
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub program: String,
    pub year_level: String,
    /// School year label, e.g. "2024-2025"
    pub school_year: String,
    /// Term amounts defining the fee schedule for this entry
    pub first: f64,
    pub second: f64,
    pub summer: f64,
}

/// Outcome of a bulk enrollment: created links plus per-entry conflicts
#[derive(Debug, Default)]
pub struct BulkEnrollReport {
    /// Links created or fetched, in entry order
    pub enrolled: Vec<EnrollmentId>,
    /// Entries that failed, with their batch index and error
    pub conflicts: Vec<(usize, BursarError)>,
}

impl<'a> EnrollmentService<'a> {
    /// Create a new enrollment service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create or fetch the enrollment link for a (student, year, schedule)
    ///
    /// Idempotent: if an active link for the exact triple already exists
    /// it is returned as-is. A *different* active link occupying the same
    /// (student, year, semester label) slot fails with
    /// [`BursarError::DuplicateEnrollment`] and nothing is written.
    pub fn link(
        &self,
        student_id: StudentId,
        school_year_id: SchoolYearId,
        fee_schedule_id: FeeScheduleId,
    ) -> BursarResult<EnrollmentLink> {
        let student = self.require_student(student_id)?;
        let year = self.require_school_year(school_year_id)?;
        let schedule = self.require_fee_schedule(fee_schedule_id)?;

        if !year.active {
            return Err(BursarError::Validation(format!(
                "School year {} is not open for enrollment",
                year.label
            )));
        }
        if !student.active {
            return Err(BursarError::Validation(format!(
                "Student {} is deactivated",
                student.student_number
            )));
        }

        let existing = self
            .storage
            .enrollments
            .active_for_student_year(student_id, school_year_id)?;

        // Exact triple already linked: return it
        if let Some(link) = existing
            .iter()
            .find(|l| l.same_triple(student_id, school_year_id, fee_schedule_id))
        {
            return Ok(link.clone());
        }

        self.check_slot_free(&student, &year, &schedule, &existing)?;

        let link = EnrollmentLink::new(student_id, school_year_id, fee_schedule_id);
        self.storage.enrollments.upsert(link.clone())?;
        self.storage.enrollments.save()?;

        tracing::info!(
            enrollment = %link.id,
            student = %student.student_number,
            school_year = %year.label,
            "enrollment link created"
        );

        Ok(link)
    }

    /// Deactivate (withdraw) an enrollment link
    pub fn deactivate(&self, enrollment_id: EnrollmentId) -> BursarResult<()> {
        let mut link = self
            .storage
            .enrollments
            .get(enrollment_id)?
            .ok_or_else(|| BursarError::link_not_found(enrollment_id.to_string()))?;

        link.deactivate();
        self.storage.enrollments.upsert(link)?;
        self.storage.enrollments.save()?;

        tracing::info!(enrollment = %enrollment_id, "enrollment link deactivated");
        Ok(())
    }

    /// Reactivate (restore) a withdrawn enrollment link
    ///
    /// Fails with [`BursarError::DuplicateEnrollment`] if a different
    /// active link now occupies the same (student, year, semester) slot.
    pub fn reactivate(&self, enrollment_id: EnrollmentId) -> BursarResult<()> {
        let mut link = self
            .storage
            .enrollments
            .get(enrollment_id)?
            .ok_or_else(|| BursarError::link_not_found(enrollment_id.to_string()))?;

        if link.active {
            return Ok(());
        }

        let student = self.require_student(link.student_id)?;
        let year = self.require_school_year(link.school_year_id)?;
        let schedule = self.require_fee_schedule(link.fee_schedule_id)?;

        let existing = self
            .storage
            .enrollments
            .active_for_student_year(link.student_id, link.school_year_id)?;
        self.check_slot_free(&student, &year, &schedule, &existing)?;

        link.reactivate();
        self.storage.enrollments.upsert(link)?;
        self.storage.enrollments.save()?;

        tracing::info!(enrollment = %enrollment_id, "enrollment link reactivated");
        Ok(())
    }

    /// Whether an enrollment link exists and is active
    pub fn is_active(&self, enrollment_id: EnrollmentId) -> BursarResult<bool> {
        Ok(self
            .storage
            .enrollments
            .get(enrollment_id)?
            .map(|l| l.active)
            .unwrap_or(false))
    }

    /// Enroll a batch of externally ingested entries
    ///
    /// Students, school years and fee schedules are resolved or created
    /// per entry. Failures are collected per entry instead of aborting
    /// the batch, so the caller can report conflicts back to the source.
    pub fn bulk_enroll(&self, entries: &[EnrollmentEntry]) -> BursarResult<BulkEnrollReport> {
        let mut report = BulkEnrollReport::default();

        for (index, entry) in entries.iter().enumerate() {
            match self.enroll_entry(entry) {
                Ok(id) => report.enrolled.push(id),
                Err(e) => report.conflicts.push((index, e)),
            }
        }

        Ok(report)
    }

    fn enroll_entry(&self, entry: &EnrollmentEntry) -> BursarResult<EnrollmentId> {
        // Resolve or create the student by number
        let student = match self.storage.students.get_by_number(&entry.student_number)? {
            Some(s) => s,
            None => {
                let mut student = Student::new(
                    entry.student_number.clone(),
                    entry.first_name.clone(),
                    entry.last_name.clone(),
                );
                student.program = entry.program.clone();
                student.year_level = entry.year_level.clone();
                student
                    .validate()
                    .map_err(BursarError::Validation)?;
                self.storage.students.upsert(student.clone())?;
                self.storage.students.save()?;
                student
            }
        };

        // Resolve or create the school year by label
        let year = match self.storage.school_years.get_by_label(&entry.school_year)? {
            Some(y) => y,
            None => {
                let year = SchoolYear::new(entry.school_year.clone());
                year.validate().map_err(BursarError::Validation)?;
                self.storage.school_years.upsert(year.clone())?;
                self.storage.school_years.save()?;
                year
            }
        };

        // Resolve or create the fee schedule for this amount combination
        let schedule = match self
            .storage
            .fee_schedules
            .find_matching(entry.first, entry.second, entry.summer)?
        {
            Some(s) => s,
            None => {
                let schedule = FeeSchedule::new(entry.first, entry.second, entry.summer);
                schedule.validate().map_err(BursarError::Validation)?;
                self.storage.fee_schedules.upsert(schedule.clone())?;
                self.storage.fee_schedules.save()?;
                schedule
            }
        };

        Ok(self.link(student.id, year.id, schedule.id)?.id)
    }

    /// Fail if another active link occupies the same semester slot
    fn check_slot_free(
        &self,
        student: &Student,
        year: &SchoolYear,
        schedule: &FeeSchedule,
        existing_active: &[EnrollmentLink],
    ) -> BursarResult<()> {
        // A schedule with no term amounts has no semester slot to occupy
        let Some(label) = schedule.semester_label() else {
            return Ok(());
        };

        for other in existing_active {
            let other_label = self
                .storage
                .fee_schedules
                .get(other.fee_schedule_id)?
                .and_then(|s| s.semester_label());

            if other_label == Some(label) {
                return Err(BursarError::DuplicateEnrollment {
                    student: student.student_number.clone(),
                    school_year: year.label.clone(),
                    semester: label.to_string(),
                    existing: other.id.to_string(),
                });
            }
        }

        Ok(())
    }

    fn require_student(&self, id: StudentId) -> BursarResult<Student> {
        self.storage
            .students
            .get(id)?
            .ok_or_else(|| BursarError::student_not_found(id.to_string()))
    }

    fn require_school_year(&self, id: SchoolYearId) -> BursarResult<SchoolYear> {
        self.storage
            .school_years
            .get(id)?
            .ok_or_else(|| BursarError::school_year_not_found(id.to_string()))
    }

    fn require_fee_schedule(&self, id: FeeScheduleId) -> BursarResult<FeeSchedule> {
        self.storage
            .fee_schedules
            .get(id)?
            .ok_or_else(|| BursarError::fee_schedule_not_found(id.to_string()))
    }

    /// Find the semester label of an enrollment's fee schedule
    pub fn semester_of(&self, enrollment_id: EnrollmentId) -> BursarResult<Option<SemesterLabel>> {
        let link = self
            .storage
            .enrollments
            .get(enrollment_id)?
            .ok_or_else(|| BursarError::link_not_found(enrollment_id.to_string()))?;

        Ok(self
            .storage
            .fee_schedules
            .get(link.fee_schedule_id)?
            .and_then(|s| s.semester_label()))
    }
}
