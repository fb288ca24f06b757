//! Business logic services for the payable ledger
//!
//! Services borrow the storage coordinator and implement the write-side
//! rules: enrollment slot uniqueness, the payment bounds checks, status
//! recomputation and the school year lifecycle guards.

pub mod auth;
pub mod enrollment;
pub mod ledger;
pub mod school_year;
pub mod student;

pub use auth::AuthService;
pub use enrollment::{BulkEnrollReport, EnrollmentEntry, EnrollmentService};
pub use ledger::{LedgerFilter, LedgerService, LedgerState, PaymentMode};
pub use school_year::SchoolYearService;
pub use student::{StudentService, StudentUpdate};
