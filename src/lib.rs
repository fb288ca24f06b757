//! Bursar - Student tuition payable ledger
//!
//! This library implements the billing core of a school registrar system:
//! per-student, per-term tuition obligations, payment accumulation with an
//! UNPAID/PARTIAL/PAID/OVERDUE status machine, and encrypted-at-rest
//! monetary columns.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory and path management
//! - `error`: Custom error types
//! - `models`: Core data models (students, school years, fee schedules,
//!   enrollment links, ledger rows, admins)
//! - `crypto`: Amount encryption and credential hashing
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `reports`: Read-side summaries and exports
//!
//! # Example
//!
//! ```rust,ignore
//! use bursar::config::BursarPaths;
//! use bursar::storage::Storage;
//! use bursar::services::LedgerService;
//!
//! let mut storage = Storage::new(BursarPaths::new()?)?;
//! storage.load_all()?;
//! let ledger = LedgerService::new(&storage);
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BursarError, BursarResult};
