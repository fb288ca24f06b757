//! Student repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BursarError;
use crate::models::{Student, StudentId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable student data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct StudentData {
    students: Vec<Student>,
}

/// Repository for student persistence
pub struct StudentRepository {
    path: PathBuf,
    data: RwLock<HashMap<StudentId, Student>>,
}

impl StudentRepository {
    /// Create a new student repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load students from disk
    pub fn load(&self) -> Result<(), BursarError> {
        let file_data: StudentData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for student in file_data.students {
            data.insert(student.id, student);
        }

        Ok(())
    }

    /// Save students to disk
    pub fn save(&self) -> Result<(), BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = StudentData {
            students: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a student by ID
    pub fn get(&self, id: StudentId) -> Result<Option<Student>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all students, sorted by name
    pub fn get_all(&self) -> Result<Vec<Student>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut students: Vec<_> = data.values().cloned().collect();
        students.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then(a.first_name.cmp(&b.first_name))
        });
        Ok(students)
    }

    /// Get all active students
    pub fn get_active(&self) -> Result<Vec<Student>, BursarError> {
        let all = self.get_all()?;
        Ok(all.into_iter().filter(|s| s.active).collect())
    }

    /// Get a student by student number
    pub fn get_by_number(&self, student_number: &str) -> Result<Option<Student>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .find(|s| s.student_number == student_number)
            .cloned())
    }

    /// Insert or update a student
    pub fn upsert(&self, student: Student) -> Result<(), BursarError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(student.id, student);
        Ok(())
    }

    /// Check if a student exists
    pub fn exists(&self, id: StudentId) -> Result<bool, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&id))
    }

    /// Count students
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

    fn create_test_repo() -> (TempDir, StudentRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("students.json");
        let repo = StudentRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let student = Student::new("2021-00042", "Maria", "Santos");
        let id = student.id;

        repo.upsert(student).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.student_number, "2021-00042");
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();

        let student = Student::new("2021-00042", "Maria", "Santos");
        let id = student.id;

        repo.load().unwrap();
        repo.upsert(student).unwrap();
        repo.save().unwrap();

        let path = temp_dir.path().join("students.json");
        let repo2 = StudentRepository::new(path);
        repo2.load().unwrap();

        let retrieved = repo2.get(id).unwrap().unwrap();
        assert_eq!(retrieved.first_name, "Maria");
    }

    #[test]
    fn test_get_by_number() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let student = Student::new("2021-00042", "Maria", "Santos");
        repo.upsert(student).unwrap();

        assert!(repo.get_by_number("2021-00042").unwrap().is_some());
        assert!(repo.get_by_number("1999-00001").unwrap().is_none());
    }

    #[test]
    fn test_get_active_filters_deactivated() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let active = Student::new("2021-00001", "Ana", "Reyes");
        let mut dropped = Student::new("2021-00002", "Ben", "Cruz");
        dropped.deactivate();

        repo.upsert(active).unwrap();
        repo.upsert(dropped).unwrap();

        assert_eq!(repo.get_all().unwrap().len(), 2);
        assert_eq!(repo.get_active().unwrap().len(), 1);
    }
}
