//! Enrollment link repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BursarError;
use crate::models::{EnrollmentId, EnrollmentLink, SchoolYearId, StudentId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable enrollment data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EnrollmentData {
    enrollments: Vec<EnrollmentLink>,
}

/// Repository for enrollment link persistence
pub struct EnrollmentRepository {
    path: PathBuf,
    data: RwLock<HashMap<EnrollmentId, EnrollmentLink>>,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load enrollments from disk
    pub fn load(&self) -> Result<(), BursarError> {
        let file_data: EnrollmentData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for link in file_data.enrollments {
            data.insert(link.id, link);
        }

        Ok(())
    }

    /// Save enrollments to disk
    pub fn save(&self) -> Result<(), BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = EnrollmentData {
            enrollments: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get an enrollment link by ID
    pub fn get(&self, id: EnrollmentId) -> Result<Option<EnrollmentLink>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all enrollment links
    pub fn get_all(&self) -> Result<Vec<EnrollmentLink>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().cloned().collect())
    }

    /// Get all active enrollment links
    pub fn get_active(&self) -> Result<Vec<EnrollmentLink>, BursarError> {
        Ok(self.get_all()?.into_iter().filter(|l| l.active).collect())
    }

    /// Get the active links for one student in one school year
    pub fn active_for_student_year(
        &self,
        student_id: StudentId,
        school_year_id: SchoolYearId,
    ) -> Result<Vec<EnrollmentLink>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|l| {
                l.active && l.student_id == student_id && l.school_year_id == school_year_id
            })
            .cloned()
            .collect())
    }

    /// Count active links referencing a school year
    pub fn count_active_for_year(&self, school_year_id: SchoolYearId) -> Result<usize, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|l| l.active && l.school_year_id == school_year_id)
            .count())
    }

    /// Insert or update an enrollment link
    pub fn upsert(&self, link: EnrollmentLink) -> Result<(), BursarError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(link.id, link);
        Ok(())
    }

    /// Check if an enrollment link exists
    pub fn exists(&self, id: EnrollmentId) -> Result<bool, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&id))
    }
}
