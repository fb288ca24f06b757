//! Enrollment Summary Report
//!
//! Per-student billing summary for one school year: what each active
//! enrollment link owes, has paid, and still has outstanding. Status is
//! recomputed against the given date, never read back from storage.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::{BursarError, BursarResult};
use crate::models::{format_amount, recompute_status, round2, EnrollmentId, PaymentStatus};
use crate::storage::Storage;

/// One billed enrollment in the summary
#[derive(Debug, Clone)]
pub struct SummaryRow {
    /// Enrollment link
    pub enrollment_id: EnrollmentId,
    /// Institution-assigned student number
    pub student_number: String,
    /// Display name, "Last, First Middle"
    pub student_name: String,
    /// Semester label, or "-" when the schedule has no amounts
    pub semester: String,
    /// Total payable for the term
    pub total_payable: f64,
    /// Amount paid so far
    pub amount_paid: f64,
    /// Remaining balance
    pub remaining_balance: f64,
    /// Status as of the report date
    pub status: PaymentStatus,
    /// Due date, if any
    pub due_date: Option<NaiveDate>,
}

/// Enrollment Summary Report
#[derive(Debug, Clone)]
pub struct EnrollmentSummaryReport {
    /// School year label the report covers
    pub school_year: String,
    /// Report date used for status recomputation
    pub as_of: NaiveDate,
    /// One row per active enrollment link
    pub rows: Vec<SummaryRow>,
    /// Sum of total payable across rows
    pub total_payable: f64,
    /// Sum of amounts paid across rows
    pub total_collected: f64,
    /// Sum of remaining balances across rows
    pub total_outstanding: f64,
}

impl EnrollmentSummaryReport {
    /// Generate the summary for one school year
    pub fn generate(storage: &Storage, school_year: &str, as_of: NaiveDate) -> BursarResult<Self> {
        let year = storage
            .school_years
            .get_by_label(school_year)?
            .ok_or_else(|| BursarError::school_year_not_found(school_year))?;

        let mut rows = Vec::new();
        let mut total_payable = 0.0;
        let mut total_collected = 0.0;

        for link in storage.enrollments.get_active()? {
            if link.school_year_id != year.id {
                continue;
            }

            let Some(student) = storage.students.get(link.student_id)? else {
                continue;
            };
            let Some(schedule) = storage.fee_schedules.get(link.fee_schedule_id)? else {
                continue;
            };

            let payable = schedule.total_payable();
            let (paid, due_date) = match storage.ledger.get(link.id)? {
                Some(row) => (row.amount_paid, row.due_date),
                None => (0.0, None),
            };

            total_payable += payable;
            total_collected += paid;

            rows.push(SummaryRow {
                enrollment_id: link.id,
                student_name: student.full_name(),
                student_number: student.student_number,
                semester: schedule
                    .semester_label()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".into()),
                total_payable: payable,
                amount_paid: paid,
                remaining_balance: round2((payable - paid).max(0.0)),
                status: recompute_status(paid, payable, due_date, as_of),
                due_date,
            });
        }

        rows.sort_by(|a, b| a.student_name.cmp(&b.student_name));

        let total_payable = round2(total_payable);
        let total_collected = round2(total_collected);

        Ok(Self {
            school_year: year.label,
            as_of,
            total_outstanding: round2((total_payable - total_collected).max(0.0)),
            rows,
            total_payable,
            total_collected,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Enrollment Summary: {} (as of {})\n",
            self.school_year, self.as_of
        ));
        output.push_str(&"=".repeat(100));
        output.push('\n');

        output.push_str(&format!(
            "{:<12} {:<30} {:<8} {:>12} {:>12} {:>12} {:<8}\n",
            "Number", "Student", "Sem", "Payable", "Paid", "Balance", "Status"
        ));
        output.push_str(&"-".repeat(100));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<12} {:<30} {:<8} {:>12} {:>12} {:>12} {:<8}\n",
                row.student_number,
                row.student_name,
                row.semester,
                format_amount(row.total_payable),
                format_amount(row.amount_paid),
                format_amount(row.remaining_balance),
                row.status
            ));
        }

        output.push_str(&"-".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "{:<52} {:>12} {:>12} {:>12}\n",
            "TOTAL",
            format_amount(self.total_payable),
            format_amount(self.total_collected),
            format_amount(self.total_outstanding)
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BursarResult<()> {
        writeln!(
            writer,
            "School Year,Student Number,Student,Semester,Total Payable,Amount Paid,Remaining Balance,Status,Due Date"
        )?;

        for row in &self.rows {
            writeln!(
                writer,
                "{},{},\"{}\",{},{:.2},{:.2},{:.2},{},{}",
                self.school_year,
                row.student_number,
                row.student_name,
                row.semester,
                row.total_payable,
                row.amount_paid,
                row.remaining_balance,
                row.status,
                row.due_date.map(|d| d.to_string()).unwrap_or_default()
            )?;
        }

        writeln!(
            writer,
            "{},TOTAL,,,{:.2},{:.2},{:.2},,",
            self.school_year, self.total_payable, self.total_collected, self.total_outstanding
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BursarPaths;
    use crate::models::{FeeSchedule, SchoolYear, Student};
    use crate::services::{EnrollmentService, LedgerService};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BursarPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed(storage: &Storage) -> EnrollmentId {
        let student = Student::new("2021-00007", "Maria", "Santos");
        let year = SchoolYear::new("2024-2025");
        let schedule = FeeSchedule::new(50000.0, 0.0, 0.0);

        let (student_id, year_id, schedule_id) = (student.id, year.id, schedule.id);
        storage.students.upsert(student).unwrap();
        storage.school_years.upsert(year).unwrap();
        storage.fee_schedules.upsert(schedule).unwrap();

        EnrollmentService::new(storage)
            .link(student_id, year_id, schedule_id)
            .unwrap()
            .id
    }

    #[test]
    fn test_generate_summary() {
        let (_temp_dir, storage) = create_test_storage();
        let enrollment = seed(&storage);
        let today = date(2025, 6, 1);

        LedgerService::new(&storage)
            .accumulate(enrollment, 20000.0, today)
            .unwrap();

        let report = EnrollmentSummaryReport::generate(&storage, "2024-2025", today).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].student_name, "Santos, Maria");
        assert_eq!(report.rows[0].student_number, "2021-00007");
        assert_eq!(report.rows[0].amount_paid, 20000.0);
        assert_eq!(report.rows[0].status, PaymentStatus::Partial);
        assert_eq!(report.total_outstanding, 30000.0);
    }

    #[test]
    fn test_row_without_ledger_entry_is_unpaid() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let report =
            EnrollmentSummaryReport::generate(&storage, "2024-2025", date(2025, 6, 1)).unwrap();
        assert_eq!(report.rows[0].amount_paid, 0.0);
        assert_eq!(report.rows[0].status, PaymentStatus::Unpaid);
        assert_eq!(report.total_outstanding, 50000.0);
    }

    #[test]
    fn test_unknown_year_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let err = EnrollmentSummaryReport::generate(&storage, "1999-2000", date(2025, 6, 1))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_csv_export() {
        let (_temp_dir, storage) = create_test_storage();
        let enrollment = seed(&storage);
        let today = date(2025, 6, 1);

        LedgerService::new(&storage)
            .accumulate(enrollment, 20000.0, today)
            .unwrap();

        let report = EnrollmentSummaryReport::generate(&storage, "2024-2025", today).unwrap();
        let mut csv = Vec::new();
        report.export_csv(&mut csv).unwrap();

        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.contains("2021-00007"));
        assert!(csv.contains("20000.00"));
        assert!(csv.lines().last().unwrap().contains("TOTAL"));
    }
}
