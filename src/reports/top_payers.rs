//! Top Payers Report
//!
//! Ranks students by total amount paid across their enrollment links.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Write;

use crate::error::BursarResult;
use crate::models::{format_amount, round2, StudentId};
use crate::storage::Storage;

/// One ranked student
#[derive(Debug, Clone)]
pub struct PayerRow {
    /// Student
    pub student_id: StudentId,
    /// Institution-assigned student number
    pub student_number: String,
    /// Display name
    pub student_name: String,
    /// Total paid across all enrollments
    pub total_paid: f64,
    /// Number of enrollment links with payments
    pub enrollment_count: usize,
}

/// Top Payers Report
#[derive(Debug, Clone)]
pub struct TopPayersReport {
    /// Report date
    pub as_of: NaiveDate,
    /// Ranked rows, highest total first
    pub rows: Vec<PayerRow>,
}

impl TopPayersReport {
    /// Generate the ranking, keeping at most `limit` students
    pub fn generate(storage: &Storage, limit: usize, as_of: NaiveDate) -> BursarResult<Self> {
        // Aggregate paid amounts per student across their links
        let mut totals: HashMap<StudentId, (f64, usize)> = HashMap::new();

        for link in storage.enrollments.get_active()? {
            let Some(row) = storage.ledger.get(link.id)? else {
                continue;
            };
            if row.amount_paid <= 0.0 {
                continue;
            }

            let entry = totals.entry(link.student_id).or_insert((0.0, 0));
            entry.0 += row.amount_paid;
            entry.1 += 1;
        }

        let mut rows = Vec::new();
        for (student_id, (total_paid, enrollment_count)) in totals {
            let Some(student) = storage.students.get(student_id)? else {
                continue;
            };
            rows.push(PayerRow {
                student_id,
                student_name: student.full_name(),
                student_number: student.student_number,
                total_paid: round2(total_paid),
                enrollment_count,
            });
        }

        rows.sort_by(|a, b| {
            b.total_paid
                .partial_cmp(&a.total_paid)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.student_name.cmp(&b.student_name))
        });
        rows.truncate(limit);

        Ok(Self { as_of, rows })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Top Payers (as of {})\n", self.as_of));
        output.push_str(&"=".repeat(70));
        output.push('\n');

        output.push_str(&format!(
            "{:<5} {:<12} {:<30} {:>12} {:>6}\n",
            "Rank", "Number", "Student", "Paid", "Links"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for (index, row) in self.rows.iter().enumerate() {
            output.push_str(&format!(
                "{:<5} {:<12} {:<30} {:>12} {:>6}\n",
                index + 1,
                row.student_number,
                row.student_name,
                format_amount(row.total_paid),
                row.enrollment_count
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BursarResult<()> {
        writeln!(writer, "Rank,Student Number,Student,Total Paid,Enrollments")?;

        for (index, row) in self.rows.iter().enumerate() {
            writeln!(
                writer,
                "{},{},\"{}\",{:.2},{}",
                index + 1,
                row.student_number,
                row.student_name,
                row.total_paid,
                row.enrollment_count
            )?;
        }

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

    #[test]
    fn test_ranking_orders_by_total_paid() {
        let (_temp_dir, storage) = create_test_storage();
        let year = SchoolYear::new("2024-2025");
        let year_id = year.id;
        storage.school_years.upsert(year).unwrap();

        let enrollments = EnrollmentService::new(&storage);
        let ledger = LedgerService::new(&storage);
        let today = date(2025, 6, 1);

        for (number, name, paid) in [
            ("2021-00001", "Reyes", 5000.0),
            ("2021-00002", "Santos", 20000.0),
            ("2021-00003", "Cruz", 12000.0),
        ] {
            let student = Student::new(number, "Ana", name);
            let schedule = FeeSchedule::new(50000.0, 0.0, 0.0);
            let (student_id, schedule_id) = (student.id, schedule.id);
            storage.students.upsert(student).unwrap();
            storage.fee_schedules.upsert(schedule).unwrap();

            let link = enrollments.link(student_id, year_id, schedule_id).unwrap();
            ledger.accumulate(link.id, paid, today).unwrap();
        }

        let report = TopPayersReport::generate(&storage, 2, today).unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].student_number, "2021-00002");
        assert_eq!(report.rows[0].student_name, "Santos, Ana");
        assert_eq!(report.rows[0].total_paid, 20000.0);
        assert_eq!(report.rows[1].student_number, "2021-00003");
    }

    #[test]
    fn test_students_without_payments_excluded() {
        let (_temp_dir, storage) = create_test_storage();

        let student = Student::new("2021-00001", "Ana", "Reyes");
        let year = SchoolYear::new("2024-2025");
        let schedule = FeeSchedule::new(50000.0, 0.0, 0.0);
        let (student_id, year_id, schedule_id) = (student.id, year.id, schedule.id);
        storage.students.upsert(student).unwrap();
        storage.school_years.upsert(year).unwrap();
        storage.fee_schedules.upsert(schedule).unwrap();

        EnrollmentService::new(&storage)
            .link(student_id, year_id, schedule_id)
            .unwrap();

        let report = TopPayersReport::generate(&storage, 10, date(2025, 6, 1)).unwrap();
        assert!(report.rows.is_empty());
    }
}
