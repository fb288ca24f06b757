//! Storage layer for the payable ledger
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Monetary columns in the ledger file are encrypted by the
//! amount cipher before they reach disk.

pub mod admins;
pub mod enrollments;
pub mod fee_schedules;
pub mod file_io;
pub mod ledger;
pub mod school_years;
pub mod students;

pub use admins::AdminRepository;
pub use enrollments::EnrollmentRepository;
pub use fee_schedules::FeeScheduleRepository;
pub use file_io::{read_json, write_json_atomic};
pub use ledger::{LedgerRecord, LedgerRepository};
pub use school_years::SchoolYearRepository;
pub use students::StudentRepository;

use crate::config::BursarPaths;
use crate::crypto::AmountCipher;
use crate::error::BursarError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BursarPaths,
    pub students: StudentRepository,
    pub school_years: SchoolYearRepository,
    pub fee_schedules: FeeScheduleRepository,
    pub enrollments: EnrollmentRepository,
    pub ledger: LedgerRepository,
    pub admins: AdminRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BursarPaths) -> Result<Self, BursarError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            students: StudentRepository::new(paths.students_file()),
            school_years: SchoolYearRepository::new(paths.school_years_file()),
            fee_schedules: FeeScheduleRepository::new(paths.fee_schedules_file()),
            enrollments: EnrollmentRepository::new(paths.enrollments_file()),
            ledger: LedgerRepository::new(paths.ledger_file(), AmountCipher::new()),
            admins: AdminRepository::new(paths.admins_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BursarPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), BursarError> {
        self.students.load()?;
        self.school_years.load()?;
        self.fee_schedules.load()?;
        self.enrollments.load()?;
        self.ledger.load()?;
        self.admins.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BursarError> {
        self.students.save()?;
        self.school_years.save()?;
        self.fee_schedules.save()?;
        self.enrollments.save()?;
        self.ledger.save()?;
        self.admins.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BursarPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        storage.load_all().unwrap();
        storage.save_all().unwrap();
    }
}
