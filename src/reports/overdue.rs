//! Overdue Accounts Report
//!
//! Lists every active enrollment whose due date has passed without full
//! payment, ordered by how long it has been overdue.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::BursarResult;
use crate::models::{format_amount, recompute_status, round2, EnrollmentId, PaymentStatus};
use crate::storage::Storage;

/// One overdue enrollment
#[derive(Debug, Clone)]
pub struct OverdueRow {
    /// Enrollment link
    pub enrollment_id: EnrollmentId,
    /// Institution-assigned student number
    pub student_number: String,
    /// Display name
    pub student_name: String,
    /// School year label
    pub school_year: String,
    /// Semester label, or "-"
    pub semester: String,
    /// Remaining balance
    pub remaining_balance: f64,
    /// Due date that has passed
    pub due_date: NaiveDate,
    /// Whole days past the due date
    pub days_overdue: i64,
}

/// Overdue Accounts Report
#[derive(Debug, Clone)]
pub struct OverdueReport {
    /// Report date
    pub as_of: NaiveDate,
    /// Overdue rows, longest overdue first
    pub rows: Vec<OverdueRow>,
    /// Sum of overdue balances
    pub total_overdue: f64,
}

impl OverdueReport {
    /// Generate the overdue report across all school years
    pub fn generate(storage: &Storage, as_of: NaiveDate) -> BursarResult<Self> {
        let mut rows = Vec::new();
        let mut total_overdue = 0.0;

        for link in storage.enrollments.get_active()? {
            let Some(row) = storage.ledger.get(link.id)? else {
                continue;
            };
            let Some(due_date) = row.due_date else {
                continue;
            };
            let Some(schedule) = storage.fee_schedules.get(link.fee_schedule_id)? else {
                continue;
            };

            let payable = schedule.total_payable();
            let status = recompute_status(row.amount_paid, payable, Some(due_date), as_of);
            if status != PaymentStatus::Overdue {
                continue;
            }

            let Some(student) = storage.students.get(link.student_id)? else {
                continue;
            };
            let year_label = storage
                .school_years
                .get(link.school_year_id)?
                .map(|y| y.label)
                .unwrap_or_default();

            let balance = row.remaining_balance(payable);
            total_overdue += balance;

            rows.push(OverdueRow {
                enrollment_id: link.id,
                student_name: student.full_name(),
                student_number: student.student_number,
                school_year: year_label,
                semester: schedule
                    .semester_label()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".into()),
                remaining_balance: balance,
                due_date,
                days_overdue: (as_of - due_date).num_days(),
            });
        }

        rows.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));

        Ok(Self {
            as_of,
            rows,
            total_overdue: round2(total_overdue),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Overdue Accounts (as of {})\n", self.as_of));
        output.push_str(&"=".repeat(100));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No overdue accounts.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<12} {:<30} {:<10} {:<8} {:>12} {:<12} {:>6}\n",
            "Number", "Student", "Year", "Sem", "Balance", "Due", "Days"
        ));
        output.push_str(&"-".repeat(100));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<12} {:<30} {:<10} {:<8} {:>12} {:<12} {:>6}\n",
                row.student_number,
                row.student_name,
                row.school_year,
                row.semester,
                format_amount(row.remaining_balance),
                row.due_date,
                row.days_overdue
            ));
        }

        output.push_str(&"-".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "{:<64} {:>12}\n",
            "TOTAL OVERDUE",
            format_amount(self.total_overdue)
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BursarResult<()> {
        writeln!(
            writer,
            "Student Number,Student,School Year,Semester,Remaining Balance,Due Date,Days Overdue"
        )?;

        for row in &self.rows {
            writeln!(
                writer,
                "{},\"{}\",{},{},{:.2},{},{}",
                row.student_number,
                row.student_name,
                row.school_year,
                row.semester,
                row.remaining_balance,
                row.due_date,
                row.days_overdue
            )?;
        }

        Ok(())
    }
}
