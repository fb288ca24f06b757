//! School year repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BursarError;
use crate::models::{SchoolYear, SchoolYearId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable school year data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SchoolYearData {
    school_years: Vec<SchoolYear>,
}

/// Repository for school year persistence
pub struct SchoolYearRepository {
    path: PathBuf,
    data: RwLock<HashMap<SchoolYearId, SchoolYear>>,
}

impl SchoolYearRepository {
    /// Create a new school year repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load school years from disk
    pub fn load(&self) -> Result<(), BursarError> {
        let file_data: SchoolYearData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for year in file_data.school_years {
            data.insert(year.id, year);
        }

        Ok(())
    }

    /// Save school years to disk
    pub fn save(&self) -> Result<(), BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = SchoolYearData {
            school_years: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a school year by ID
    pub fn get(&self, id: SchoolYearId) -> Result<Option<SchoolYear>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all school years, newest label first
    pub fn get_all(&self) -> Result<Vec<SchoolYear>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut years: Vec<_> = data.values().cloned().collect();
        years.sort_by(|a, b| b.label.cmp(&a.label));
        Ok(years)
    }

    /// Get a school year by its label
    pub fn get_by_label(&self, label: &str) -> Result<Option<SchoolYear>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|y| y.label == label).cloned())
    }

    /// Insert or update a school year
    pub fn upsert(&self, year: SchoolYear) -> Result<(), BursarError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(year.id, year);
        Ok(())
    }

    /// Check if a school year exists
    pub fn exists(&self, id: SchoolYearId) -> Result<bool, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&id))
    }
}
