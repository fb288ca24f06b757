//! Admin model
//!
//! The single operator role. The password is stored as a salted hash
//! produced by the credential store; a legacy plaintext value is still
//! accepted by verification for migration compatibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::AdminId;

/// An administrator account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    /// Unique identifier
    pub id: AdminId,

    /// Login name
    pub username: String,

    /// Salted password hash ("base64(salt):base64(hex(digest))")
    pub password_hash: String,

    /// Given name
    #[serde(default)]
    pub first_name: String,

    /// Family name
    #[serde(default)]
    pub last_name: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// Create a new admin with an already-hashed password
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: AdminId::new(),
            username: username.into(),
            password_hash: password_hash.into(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored password hash
    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = hash.into();
        self.updated_at = Utc::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Username cannot be empty".into());
        }
        if self.password_hash.is_empty() {
            return Err("Password hash cannot be empty".into());
        }
        Ok(())
    }
}
