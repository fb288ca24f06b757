//! Student account management

use crate::error::{BursarError, BursarResult};
use crate::models::{Student, StudentId};
use crate::storage::Storage;

/// Service for student record management
pub struct StudentService<'a> {
    storage: &'a Storage,
}

/// Mutable profile fields of a student; `None` leaves a field unchanged
#[derive(Debug, Default, Clone)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub program: Option<String>,
    pub year_level: Option<String>,
}

impl<'a> StudentService<'a> {
    /// Create a new student service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new student
    ///
    /// Student numbers are unique; a second registration under the same
    /// number fails with [`BursarError::Duplicate`].
    pub fn create(
        &self,
        student_number: &str,
        first_name: &str,
        last_name: &str,
    ) -> BursarResult<Student> {
        if self
            .storage
            .students
            .get_by_number(student_number)?
            .is_some()
        {
            return Err(BursarError::Duplicate {
                entity_type: "Student",
                identifier: student_number.to_string(),
            });
        }

        let student = Student::new(student_number, first_name, last_name);
        student.validate().map_err(BursarError::Validation)?;

        self.storage.students.upsert(student.clone())?;
        self.storage.students.save()?;

        tracing::info!(student = %student.student_number, "student registered");
        Ok(student)
    }

    /// Update a student's mutable profile fields
    ///
    /// The student number is identity and cannot change here.
    pub fn update(&self, id: StudentId, update: StudentUpdate) -> BursarResult<Student> {
        let mut student = self.require(id)?;

        if let Some(first_name) = update.first_name {
            student.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            student.last_name = last_name;
        }
        if let Some(middle_name) = update.middle_name {
            student.middle_name = middle_name;
        }
        if let Some(program) = update.program {
            student.program = program;
        }
        if let Some(year_level) = update.year_level {
            student.year_level = year_level;
        }

        student.validate().map_err(BursarError::Validation)?;
        student.updated_at = chrono::Utc::now();

        self.storage.students.upsert(student.clone())?;
        self.storage.students.save()?;
        Ok(student)
    }

    /// Deactivate a student (history is kept, new enrollments are refused)
    pub fn deactivate(&self, id: StudentId) -> BursarResult<()> {
        let mut student = self.require(id)?;
        student.deactivate();
        self.storage.students.upsert(student)?;
        self.storage.students.save()?;
        Ok(())
    }

    /// Reactivate a student
    pub fn reactivate(&self, id: StudentId) -> BursarResult<()> {
        let mut student = self.require(id)?;
        student.reactivate();
        self.storage.students.upsert(student)?;
        self.storage.students.save()?;
        Ok(())
    }

    /// Look up a student by ID
    pub fn get(&self, id: StudentId) -> BursarResult<Student> {
        self.require(id)
    }

    /// Look up a student by student number
    pub fn get_by_number(&self, student_number: &str) -> BursarResult<Student> {
        self.storage
            .students
            .get_by_number(student_number)?
            .ok_or_else(|| BursarError::student_not_found(student_number))
    }

    /// List all students, active first, sorted by name
    pub fn list(&self) -> BursarResult<Vec<Student>> {
        let mut students = self.storage.students.get_all()?;
        students.sort_by(|a, b| {
            b.active
                .cmp(&a.active)
                .then_with(|| a.full_name().cmp(&b.full_name()))
        });
        Ok(students)
    }

    fn require(&self, id: StudentId) -> BursarResult<Student> {
        self.storage
            .students
            .get(id)?
            .ok_or_else(|| BursarError::student_not_found(id.to_string()))
    }
}
