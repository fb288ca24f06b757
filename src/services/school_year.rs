//! School year management
//!
//! School years gate enrollment: linking into an inactive year is refused,
//! and a year cannot be closed while active enrollment links still point
//! at it.

use crate::error::{BursarError, BursarResult};
use crate::models::{SchoolYear, SchoolYearId};
use crate::storage::Storage;

/// Service for school year management
pub struct SchoolYearService<'a> {
    storage: &'a Storage,
}

impl<'a> SchoolYearService<'a> {
    /// Create a new school year service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Open a new school year
    pub fn create(&self, label: &str) -> BursarResult<SchoolYear> {
        if self.storage.school_years.get_by_label(label)?.is_some() {
            return Err(BursarError::Duplicate {
                entity_type: "School year",
                identifier: label.to_string(),
            });
        }

        let year = SchoolYear::new(label);
        year.validate().map_err(BursarError::Validation)?;

        self.storage.school_years.upsert(year.clone())?;
        self.storage.school_years.save()?;

        tracing::info!(school_year = %year.label, "school year opened");
        Ok(year)
    }

    /// Close a school year
    ///
    /// Refused with [`BursarError::SchoolYearInUse`] while any active
    /// enrollment link still references the year.
    pub fn deactivate(&self, id: SchoolYearId) -> BursarResult<()> {
        let mut year = self.require(id)?;

        let active_links = self.storage.enrollments.count_active_for_year(id)?;
        if active_links > 0 {
            return Err(BursarError::SchoolYearInUse {
                school_year: year.label,
                active_links,
            });
        }

        year.deactivate();
        self.storage.school_years.upsert(year)?;
        self.storage.school_years.save()?;
        Ok(())
    }

    /// Reopen a closed school year
    pub fn reactivate(&self, id: SchoolYearId) -> BursarResult<()> {
        let mut year = self.require(id)?;
        year.reactivate();
        self.storage.school_years.upsert(year)?;
        self.storage.school_years.save()?;
        Ok(())
    }

    /// Look up a school year by ID
    pub fn get(&self, id: SchoolYearId) -> BursarResult<SchoolYear> {
        self.require(id)
    }

    /// Look up a school year by its label
    pub fn get_by_label(&self, label: &str) -> BursarResult<SchoolYear> {
        self.storage
            .school_years
            .get_by_label(label)?
            .ok_or_else(|| BursarError::school_year_not_found(label))
    }

    /// List all school years, newest label first
    pub fn list(&self) -> BursarResult<Vec<SchoolYear>> {
        let mut years = self.storage.school_years.get_all()?;
        years.sort_by(|a, b| b.label.cmp(&a.label));
        Ok(years)
    }

    fn require(&self, id: SchoolYearId) -> BursarResult<SchoolYear> {
        self.storage
            .school_years
            .get(id)?
            .ok_or_else(|| BursarError::school_year_not_found(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BursarPaths;
    use crate::models::{EnrollmentLink, FeeScheduleId, StudentId};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BursarPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_validates_label() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SchoolYearService::new(&storage);

        assert!(service.create("2024-2025").is_ok());
        assert!(service.create("2024-2027").unwrap_err().is_validation());
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SchoolYearService::new(&storage);

        service.create("2024-2025").unwrap();
        let err = service.create("2024-2025").unwrap_err();
        assert!(matches!(err, BursarError::Duplicate { .. }));
    }

    #[test]
    fn test_deactivate_blocked_by_active_links() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SchoolYearService::new(&storage);

        let year = service.create("2024-2025").unwrap();
        storage
            .enrollments
            .upsert(EnrollmentLink::new(
                StudentId::new(),
                year.id,
                FeeScheduleId::new(),
            ))
            .unwrap();

        let err = service.deactivate(year.id).unwrap_err();
        assert!(matches!(
            err,
            BursarError::SchoolYearInUse { active_links: 1, .. }
        ));
        assert!(service.get(year.id).unwrap().active);
    }

    #[test]
    fn test_deactivate_allowed_when_links_withdrawn() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SchoolYearService::new(&storage);

        let year = service.create("2024-2025").unwrap();
        let mut link = EnrollmentLink::new(StudentId::new(), year.id, FeeScheduleId::new());
        link.deactivate();
        storage.enrollments.upsert(link).unwrap();

        service.deactivate(year.id).unwrap();
        assert!(!service.get(year.id).unwrap().active);

        service.reactivate(year.id).unwrap();
        assert!(service.get(year.id).unwrap().active);
    }

    #[test]
    fn test_list_newest_first() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SchoolYearService::new(&storage);

        service.create("2023-2024").unwrap();
        service.create("2024-2025").unwrap();

        let years = service.list().unwrap();
        assert_eq!(years[0].label, "2024-2025");
    }
}
