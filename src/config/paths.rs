//! Path management for bursar data files
//!
//! Provides XDG-compliant path resolution for the JSON data store.
//!
//! ## Path Resolution Order
//!
//! 1. `BURSAR_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/bursar` or `~/.config/bursar`
//! 3. Windows: `%APPDATA%\bursar`

use std::path::PathBuf;

use crate::error::BursarError;

/// Manages all paths used by the bursar data store
#[derive(Debug, Clone)]
pub struct BursarPaths {
    /// Base directory for all bursar data
    base_dir: PathBuf,
}

impl BursarPaths {
    /// Create a new BursarPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BursarError> {
        let base_dir = if let Ok(custom) = std::env::var("BURSAR_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BursarPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/bursar/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/bursar/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to students.json
    pub fn students_file(&self) -> PathBuf {
        self.data_dir().join("students.json")
    }

    /// Get the path to school_years.json
    pub fn school_years_file(&self) -> PathBuf {
        self.data_dir().join("school_years.json")
    }

    /// Get the path to fee_schedules.json
    pub fn fee_schedules_file(&self) -> PathBuf {
        self.data_dir().join("fee_schedules.json")
    }

    /// Get the path to enrollments.json
    pub fn enrollments_file(&self) -> PathBuf {
        self.data_dir().join("enrollments.json")
    }

    /// Get the path to ledger.json (encrypted payable rows)
    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir().join("ledger.json")
    }

    /// Get the path to admins.json
    pub fn admins_file(&self) -> PathBuf {
        self.data_dir().join("admins.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BursarError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BursarError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BursarError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BursarError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("bursar"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BursarError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BursarError::Io("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("bursar"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BursarPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BursarPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BursarPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(
            paths.students_file(),
            temp_dir.path().join("data").join("students.json")
        );
        assert_eq!(
            paths.ledger_file(),
            temp_dir.path().join("data").join("ledger.json")
        );
    }
}
