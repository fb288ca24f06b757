//! Admin authentication
//!
//! Thin service over the credential hashing primitives: account creation
//! hashes the password with a fresh salt, authentication verifies against
//! the stored `salt:digest` string. Failed logins return `Ok(None)` so
//! callers cannot distinguish a missing account from a wrong password.

use crate::crypto::{hash_password, verify_password};
use crate::error::{BursarError, BursarResult};
use crate::models::{Admin, AdminId};
use crate::storage::Storage;

/// Service for admin accounts and login checks
pub struct AuthService<'a> {
    storage: &'a Storage,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new admin account
    ///
    /// Usernames are unique; the password is never stored, only its
    /// salted digest.
    pub fn create_admin(&self, username: &str, password: &str) -> BursarResult<Admin> {
        if username.trim().is_empty() {
            return Err(BursarError::Validation("Username cannot be empty".into()));
        }
        if password.is_empty() {
            return Err(BursarError::Validation("Password cannot be empty".into()));
        }
        if self.storage.admins.get_by_username(username)?.is_some() {
            return Err(BursarError::Duplicate {
                entity_type: "Admin",
                identifier: username.to_string(),
            });
        }

        let admin = Admin::new(username, hash_password(password));
        self.storage.admins.upsert(admin.clone())?;
        self.storage.admins.save()?;

        tracing::info!(admin = %admin.username, "admin account created");
        Ok(admin)
    }

    /// Check a username/password pair
    ///
    /// Returns the matching admin on success, `None` on any mismatch.
    pub fn authenticate(&self, username: &str, password: &str) -> BursarResult<Option<Admin>> {
        let Some(admin) = self.storage.admins.get_by_username(username)? else {
            tracing::warn!(admin = username, "login for unknown admin");
            return Ok(None);
        };

        if verify_password(password, &admin.password_hash) {
            Ok(Some(admin))
        } else {
            tracing::warn!(admin = username, "login with wrong password");
            Ok(None)
        }
    }

    /// Change an admin's password, re-salting the stored digest
    pub fn change_password(&self, id: AdminId, new_password: &str) -> BursarResult<()> {
        if new_password.is_empty() {
            return Err(BursarError::Validation("Password cannot be empty".into()));
        }

        let mut admin = self
            .storage
            .admins
            .get(id)?
            .ok_or_else(|| BursarError::admin_not_found(id.to_string()))?;

        admin.set_password_hash(hash_password(new_password));
        self.storage.admins.upsert(admin.clone())?;
        self.storage.admins.save()?;

        tracing::info!(admin = %admin.username, "admin password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BursarPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BursarPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_and_authenticate() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);

        service.create_admin("registrar", "s3cret").unwrap();

        assert!(service.authenticate("registrar", "s3cret").unwrap().is_some());
        assert!(service.authenticate("registrar", "wrong").unwrap().is_none());
        assert!(service.authenticate("nobody", "s3cret").unwrap().is_none());
    }

    #[test]
    fn test_password_never_stored_in_clear() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);

        let admin = service.create_admin("registrar", "s3cret").unwrap();
        assert!(!admin.password_hash.contains("s3cret"));
        assert!(admin.password_hash.contains(':'));
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);

        service.create_admin("registrar", "s3cret").unwrap();
        let err = service.create_admin("registrar", "other").unwrap_err();
        assert!(matches!(err, BursarError::Duplicate { .. }));
    }

    #[test]
    fn test_change_password() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);

        let admin = service.create_admin("registrar", "s3cret").unwrap();
        service.change_password(admin.id, "n3w-pass").unwrap();

        assert!(service.authenticate("registrar", "s3cret").unwrap().is_none());
        assert!(service.authenticate("registrar", "n3w-pass").unwrap().is_some());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AuthService::new(&storage);

        assert!(service.create_admin("  ", "pw").unwrap_err().is_validation());
        assert!(service
            .create_admin("registrar", "")
            .unwrap_err()
            .is_validation());
    }
}
