//! Dashboard Report
//!
//! Headline figures for the bursar's landing view: entity counts, status
//! breakdown and collection totals across all active enrollments.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::BursarResult;
use crate::models::{format_amount, recompute_status, round2, PaymentStatus};
use crate::storage::Storage;

/// Dashboard Report
#[derive(Debug, Clone)]
pub struct DashboardReport {
    /// Report date
    pub as_of: NaiveDate,
    /// Active students
    pub student_count: usize,
    /// Active enrollment links
    pub enrollment_count: usize,
    /// Links with nothing paid
    pub unpaid_count: usize,
    /// Links partially paid
    pub partial_count: usize,
    /// Links settled in full
    pub paid_count: usize,
    /// Links past their due date
    pub overdue_count: usize,
    /// Sum of total payable across active links
    pub total_payable: f64,
    /// Sum of amounts paid
    pub total_collected: f64,
    /// Sum of remaining balances
    pub total_outstanding: f64,
}

impl DashboardReport {
    /// Generate the dashboard figures
    pub fn generate(storage: &Storage, as_of: NaiveDate) -> BursarResult<Self> {
        let student_count = storage.students.get_active()?.len();

        let mut enrollment_count = 0;
        let mut unpaid_count = 0;
        let mut partial_count = 0;
        let mut paid_count = 0;
        let mut overdue_count = 0;
        let mut total_payable = 0.0;
        let mut total_collected = 0.0;

        for link in storage.enrollments.get_active()? {
            let Some(schedule) = storage.fee_schedules.get(link.fee_schedule_id)? else {
                continue;
            };
            let payable = schedule.total_payable();

            let (paid, due_date) = match storage.ledger.get(link.id)? {
                Some(row) => (row.amount_paid, row.due_date),
                None => (0.0, None),
            };

            enrollment_count += 1;
            total_payable += payable;
            total_collected += paid;

            match recompute_status(paid, payable, due_date, as_of) {
                PaymentStatus::Unpaid => unpaid_count += 1,
                PaymentStatus::Partial => partial_count += 1,
                PaymentStatus::Paid => paid_count += 1,
                PaymentStatus::Overdue => overdue_count += 1,
            }
        }

        let total_payable = round2(total_payable);
        let total_collected = round2(total_collected);

        Ok(Self {
            as_of,
            student_count,
            enrollment_count,
            unpaid_count,
            partial_count,
            paid_count,
            overdue_count,
            total_payable,
            total_collected,
            total_outstanding: round2((total_payable - total_collected).max(0.0)),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Dashboard (as of {})\n", self.as_of));
        output.push_str(&"=".repeat(50));
        output.push('\n');

        output.push_str(&format!("Active Students:    {}\n", self.student_count));
        output.push_str(&format!("Active Enrollments: {}\n\n", self.enrollment_count));

        output.push_str(&format!("  UNPAID:  {:>6}\n", self.unpaid_count));
        output.push_str(&format!("  PARTIAL: {:>6}\n", self.partial_count));
        output.push_str(&format!("  PAID:    {:>6}\n", self.paid_count));
        output.push_str(&format!("  OVERDUE: {:>6}\n\n", self.overdue_count));

        output.push_str(&format!(
            "Total Payable:     {:>14}\n",
            format_amount(self.total_payable)
        ));
        output.push_str(&format!(
            "Total Collected:   {:>14}\n",
            format_amount(self.total_collected)
        ));
        output.push_str(&format!(
            "Total Outstanding: {:>14}\n",
            format_amount(self.total_outstanding)
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BursarResult<()> {
        writeln!(writer, "Metric,Value")?;
        writeln!(writer, "As Of,{}", self.as_of)?;
        writeln!(writer, "Active Students,{}", self.student_count)?;
        writeln!(writer, "Active Enrollments,{}", self.enrollment_count)?;
        writeln!(writer, "Unpaid,{}", self.unpaid_count)?;
        writeln!(writer, "Partial,{}", self.partial_count)?;
        writeln!(writer, "Paid,{}", self.paid_count)?;
        writeln!(writer, "Overdue,{}", self.overdue_count)?;
        writeln!(writer, "Total Payable,{:.2}", self.total_payable)?;
        writeln!(writer, "Total Collected,{:.2}", self.total_collected)?;
        writeln!(writer, "Total Outstanding,{:.2}", self.total_outstanding)?;
        Ok(())
    }
}
