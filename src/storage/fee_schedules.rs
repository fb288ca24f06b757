//! Fee schedule repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BursarError;
use crate::models::{FeeSchedule, FeeScheduleId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable fee schedule data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct FeeScheduleData {
    fee_schedules: Vec<FeeSchedule>,
}

/// Repository for fee schedule persistence
pub struct FeeScheduleRepository {
    path: PathBuf,
    data: RwLock<HashMap<FeeScheduleId, FeeSchedule>>,
}

impl FeeScheduleRepository {
    /// Create a new fee schedule repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load fee schedules from disk
    pub fn load(&self) -> Result<(), BursarError> {
        let file_data: FeeScheduleData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for schedule in file_data.fee_schedules {
            data.insert(schedule.id, schedule);
        }

        Ok(())
    }

    /// Save fee schedules to disk
    pub fn save(&self) -> Result<(), BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = FeeScheduleData {
            fee_schedules: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a fee schedule by ID
    pub fn get(&self, id: FeeScheduleId) -> Result<Option<FeeSchedule>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all fee schedules
    pub fn get_all(&self) -> Result<Vec<FeeSchedule>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().cloned().collect())
    }

    /// Find a schedule carrying exactly the given amount combination
    ///
    /// One schedule row exists per distinct combination; used by the
    /// enrollment service's find-or-create path.
    pub fn find_matching(
        &self,
        first: f64,
        second: f64,
        summer: f64,
    ) -> Result<Option<FeeSchedule>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .find(|s| s.matches_amounts(first, second, summer))
            .cloned())
    }

    /// Insert or update a fee schedule
    pub fn upsert(&self, schedule: FeeSchedule) -> Result<(), BursarError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(schedule.id, schedule);
        Ok(())
    }

    /// Check if a fee schedule exists
    pub fn exists(&self, id: FeeScheduleId) -> Result<bool, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, FeeScheduleRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fee_schedules.json");
        let repo = FeeScheduleRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_find_matching() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let schedule = FeeSchedule::new(50000.0, 0.0, 0.0);
        repo.upsert(schedule).unwrap();

        assert!(repo.find_matching(50000.0, 0.0, 0.0).unwrap().is_some());
        assert!(repo.find_matching(45000.0, 0.0, 0.0).unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let schedule = FeeSchedule::new(50000.0, 0.0, 0.0);
        let id = schedule.id;
        repo.upsert(schedule).unwrap();
        repo.save().unwrap();

        let repo2 = FeeScheduleRepository::new(temp_dir.path().join("fee_schedules.json"));
        repo2.load().unwrap();

        let retrieved = repo2.get(id).unwrap().unwrap();
        assert_eq!(retrieved.total_payable(), 50000.0);
    }
}
