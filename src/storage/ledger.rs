//! Payable ledger repository for JSON storage
//!
//! The persisted form keeps every monetary column as an opaque string
//! (the VARCHAR analog), encrypted by the amount cipher. Conversion to
//! and from the decrypted domain form happens on every read and write;
//! legacy plaintext numbers are still readable, so a data file can be
//! migrated in place simply by rewriting its rows.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::AmountCipher;
use crate::error::{BursarError, BursarResult};
use crate::models::{EnrollmentId, LedgerRow, PaymentStatus};

use super::file_io::{read_json, write_json_atomic};

/// One ledger row as persisted: amounts are opaque strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// The enrollment link this row bills
    pub enrollment_id: EnrollmentId,
    /// Encrypted downpayment amount
    pub downpayment: String,
    /// Encrypted amount paid
    pub amount_paid: String,
    /// Encrypted remaining balance (cached; re-derived on write)
    pub remaining_balance: String,
    /// Payment status at last mutation
    pub status: PaymentStatus,
    /// Due date, if any
    pub due_date: Option<NaiveDate>,
    /// When the row was created
    pub created_at: DateTime<Utc>,
    /// When the row was last modified
    pub updated_at: DateTime<Utc>,
}

/// Serializable ledger data structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerData {
    rows: Vec<LedgerRecord>,
}

/// Repository for encrypted ledger row persistence
pub struct LedgerRepository {
    path: PathBuf,
    cipher: AmountCipher,
    data: RwLock<HashMap<EnrollmentId, LedgerRecord>>,
}

impl LedgerRepository {
    /// Create a new ledger repository
    pub fn new(path: PathBuf, cipher: AmountCipher) -> Self {
        Self {
            path,
            cipher,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load ledger rows from disk
    pub fn load(&self) -> Result<(), BursarError> {
        let file_data: LedgerData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for record in file_data.rows {
            data.insert(record.enrollment_id, record);
        }

        Ok(())
    }

    /// Save ledger rows to disk
    pub fn save(&self) -> Result<(), BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = LedgerData {
            rows: data.values().cloned().collect(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a decrypted ledger row by enrollment
    pub fn get(&self, enrollment_id: EnrollmentId) -> Result<Option<LedgerRow>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&enrollment_id).map(|r| self.decrypt_record(r)))
    }

    /// Get all decrypted ledger rows
    pub fn get_all(&self) -> Result<Vec<LedgerRow>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().map(|r| self.decrypt_record(r)).collect())
    }

    /// Get the raw stored record (opaque strings) for an enrollment
    pub fn raw(&self, enrollment_id: EnrollmentId) -> Result<Option<LedgerRecord>, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&enrollment_id).cloned())
    }

    /// Insert or update a ledger row, encrypting its amounts
    ///
    /// The remaining balance is re-derived from the given total payable
    /// before encryption; the stored column is only a cache.
    pub fn upsert(&self, row: &LedgerRow, total_payable: f64) -> BursarResult<()> {
        let record = LedgerRecord {
            enrollment_id: row.enrollment_id,
            downpayment: self.cipher.encrypt(row.downpayment)?,
            amount_paid: self.cipher.encrypt(row.amount_paid)?,
            remaining_balance: self.cipher.encrypt(row.remaining_balance(total_payable))?,
            status: row.status,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        let mut data = self
            .data
            .write()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(record.enrollment_id, record);
        Ok(())
    }

    /// Check if a ledger row exists for an enrollment
    pub fn exists(&self, enrollment_id: EnrollmentId) -> Result<bool, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&enrollment_id))
    }

    /// Count ledger rows
    pub fn count(&self) -> Result<usize, BursarError> {
        let data = self
            .data
            .read()
            .map_err(|e| BursarError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }

    fn decrypt_record(&self, record: &LedgerRecord) -> LedgerRow {
        LedgerRow {
            enrollment_id: record.enrollment_id,
            downpayment: self.cipher.read_stored(&record.downpayment),
            amount_paid: self.cipher.read_stored(&record.amount_paid),
            status: record.status,
            due_date: record.due_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
