//! Core data models for the payable ledger
//!
//! Plain serde value objects; formatting for display is a caller concern.

pub mod admin;
pub mod amount;
pub mod enrollment;
pub mod fee_schedule;
pub mod ids;
pub mod ledger;
pub mod school_year;
pub mod student;

pub use admin::Admin;
pub use amount::{format_amount, parse_amount, round2};
pub use enrollment::EnrollmentLink;
pub use fee_schedule::{FeeSchedule, SemesterLabel};
pub use ids::{AdminId, EnrollmentId, FeeScheduleId, SchoolYearId, StudentId};
pub use ledger::{
    recompute_status, LedgerRow, PaymentStatus, EXCESS_TOLERANCE, PAID_TOLERANCE,
};
pub use school_year::SchoolYear;
pub use student::Student;
