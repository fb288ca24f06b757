//! Reports for the payable ledger
//!
//! Read-side summaries over the stored data. Every report recomputes
//! payment status against the date it is given rather than trusting the
//! stored status column, so a row written months ago reads correctly.

pub mod dashboard;
pub mod enrollment_summary;
pub mod monthly;
pub mod overdue;
pub mod top_payers;

pub use dashboard::DashboardReport;
pub use enrollment_summary::{EnrollmentSummaryReport, SummaryRow};
pub use monthly::{MonthBucket, MonthlyTotalsReport};
pub use overdue::{OverdueReport, OverdueRow};
pub use top_payers::{PayerRow, TopPayersReport};
