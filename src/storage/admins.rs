//! Admin repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BursarError;
use crate::models::{Admin, AdminId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable admin data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AdminData {
    admins: Vec<Admin>,
}

/// Repository for admin account persistence
pub struct AdminRepository {
    path: PathBuf,
    data: RwLock<HashMap<AdminId, Admin>>,
}

impl AdminRepository {
    /// Create a new admin repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load admins from disk
    pub fn load(&self) -> Result<(), BursarError> {
        let file_data: AdminData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for admin in file_data.admins {
            data.insert(admin.id, admin);
        }

        Ok(())
    }

    /// Save admins to disk
    pub fn save(&self) -> Result<(), BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = AdminData {
            admins: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get an admin by ID
    pub fn get(&self, id: AdminId) -> Result<Option<Admin>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get an admin by username
    pub fn get_by_username(&self, username: &str) -> Result<Option<Admin>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|a| a.username == username).cloned())
    }

    /// Insert or update an admin
    pub fn upsert(&self, admin: Admin) -> Result<(), BursarError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(admin.id, admin);
        Ok(())
    }

    /// Count admins
    pub fn count(&self) -> Result<usize, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, AdminRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("admins.json");
        let repo = AdminRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_get_by_username() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let admin = Admin::new("registrar", "salt:hash");
        repo.upsert(admin).unwrap();

        assert!(repo.get_by_username("registrar").unwrap().is_some());
        assert!(repo.get_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let admin = Admin::new("registrar", "salt:hash");
        let id = admin.id;
        repo.upsert(admin).unwrap();
        repo.save().unwrap();

        let repo2 = AdminRepository::new(temp_dir.path().join("admins.json"));
        repo2.load().unwrap();
        assert!(repo2.get(id).unwrap().is_some());
    }
}
