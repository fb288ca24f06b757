//! Monthly Totals Report
//!
//! Groups ledger rows by the calendar month of their due date for one
//! year, showing expected versus collected amounts per month. Rows with
//! no due date (settled rows clear theirs) land in a separate bucket.

use chrono::Datelike;
use std::io::Write;

use crate::error::BursarResult;
use crate::models::{format_amount, round2};
use crate::storage::Storage;

/// Totals for one calendar month
#[derive(Debug, Clone, Default)]
pub struct MonthBucket {
    /// Sum of total payable for rows due this month
    pub expected: f64,
    /// Sum of amounts paid on those rows
    pub collected: f64,
    /// Number of rows due this month
    pub row_count: usize,
}

/// Monthly Totals Report
#[derive(Debug, Clone)]
pub struct MonthlyTotalsReport {
    /// Calendar year the report covers
    pub year: i32,
    /// One bucket per month, index 0 = January
    pub months: [MonthBucket; 12],
    /// Rows with no due date
    pub undated: MonthBucket,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl MonthlyTotalsReport {
    /// Generate monthly totals for one calendar year
    pub fn generate(storage: &Storage, year: i32) -> BursarResult<Self> {
        let mut months: [MonthBucket; 12] = Default::default();
        let mut undated = MonthBucket::default();

        for link in storage.enrollments.get_active()? {
            let Some(row) = storage.ledger.get(link.id)? else {
                continue;
            };
            let Some(schedule) = storage.fee_schedules.get(link.fee_schedule_id)? else {
                continue;
            };
            let payable = schedule.total_payable();

            let bucket = match row.due_date {
                Some(due) if due.year() == year => &mut months[due.month0() as usize],
                Some(_) => continue,
                None => &mut undated,
            };

            bucket.expected += payable;
            bucket.collected += row.amount_paid;
            bucket.row_count += 1;
        }

        for bucket in months.iter_mut().chain(std::iter::once(&mut undated)) {
            bucket.expected = round2(bucket.expected);
            bucket.collected = round2(bucket.collected);
        }

        Ok(Self {
            year,
            months,
            undated,
        })
    }

    /// Total expected across the year's dated buckets
    pub fn total_expected(&self) -> f64 {
        round2(self.months.iter().map(|m| m.expected).sum())
    }

    /// Total collected across the year's dated buckets
    pub fn total_collected(&self) -> f64 {
        round2(self.months.iter().map(|m| m.collected).sum())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Monthly Totals: {}\n", self.year));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>6}\n",
            "Month", "Expected", "Collected", "Rows"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for (index, bucket) in self.months.iter().enumerate() {
            if bucket.row_count == 0 {
                continue;
            }
            output.push_str(&format!(
                "{:<12} {:>12} {:>12} {:>6}\n",
                MONTH_NAMES[index],
                format_amount(bucket.expected),
                format_amount(bucket.collected),
                bucket.row_count
            ));
        }

        if self.undated.row_count > 0 {
            output.push_str(&format!(
                "{:<12} {:>12} {:>12} {:>6}\n",
                "(no due)",
                format_amount(self.undated.expected),
                format_amount(self.undated.collected),
                self.undated.row_count
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>12} {:>12}\n",
            "TOTAL",
            format_amount(self.total_expected()),
            format_amount(self.total_collected())
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BursarResult<()> {
        writeln!(writer, "Year,Month,Expected,Collected,Rows")?;

        for (index, bucket) in self.months.iter().enumerate() {
            writeln!(
                writer,
                "{},{},{:.2},{:.2},{}",
                self.year,
                MONTH_NAMES[index],
                bucket.expected,
                bucket.collected,
                bucket.row_count
            )?;
        }

        writeln!(
            writer,
            "{},(no due),{:.2},{:.2},{}",
            self.year, self.undated.expected, self.undated.collected, self.undated.row_count
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BursarPaths;
    use crate::models::{EnrollmentId, FeeSchedule, SchoolYear, Student};
    use crate::services::{EnrollmentService, LedgerService};
    use chrono::NaiveDate;
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

    fn enroll(storage: &Storage, number: &str, amount: f64) -> EnrollmentId {
        let student = Student::new(number, "Ana", "Reyes");
        let schedule = FeeSchedule::new(amount, 0.0, 0.0);
        let year = match storage.school_years.get_by_label("2024-2025").unwrap() {
            Some(y) => y,
            None => {
                let y = SchoolYear::new("2024-2025");
                storage.school_years.upsert(y.clone()).unwrap();
                y
            }
        };

        let (student_id, schedule_id) = (student.id, schedule.id);
        storage.students.upsert(student).unwrap();
        storage.fee_schedules.upsert(schedule).unwrap();

        EnrollmentService::new(storage)
            .link(student_id, year.id, schedule_id)
            .unwrap()
            .id
    }

    #[test]
    fn test_rows_bucketed_by_due_month() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = LedgerService::new(&storage);

        // Due dates auto-set to today + 2 months: June and July
        let a = enroll(&storage, "2021-00001", 10000.0);
        let b = enroll(&storage, "2021-00002", 20000.0);
        ledger.accumulate(a, 1000.0, date(2025, 4, 15)).unwrap();
        ledger.accumulate(b, 2000.0, date(2025, 5, 15)).unwrap();

        let report = MonthlyTotalsReport::generate(&storage, 2025).unwrap();

        assert_eq!(report.months[5].expected, 10000.0); // June
        assert_eq!(report.months[5].collected, 1000.0);
        assert_eq!(report.months[6].expected, 20000.0); // July
        assert_eq!(report.total_expected(), 30000.0);
        assert_eq!(report.total_collected(), 3000.0);
    }

    #[test]
    fn test_settled_rows_land_in_undated_bucket() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = LedgerService::new(&storage);

        let a = enroll(&storage, "2021-00001", 10000.0);
        ledger.accumulate(a, 10000.0, date(2025, 4, 15)).unwrap();

        let report = MonthlyTotalsReport::generate(&storage, 2025).unwrap();
        assert_eq!(report.undated.row_count, 1);
        assert_eq!(report.undated.collected, 10000.0);
        assert_eq!(report.total_expected(), 0.0);
    }

    #[test]
    fn test_other_years_excluded() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = LedgerService::new(&storage);

        let a = enroll(&storage, "2021-00001", 10000.0);
        ledger.accumulate(a, 1000.0, date(2024, 12, 1)).unwrap();

        // Due date lands in February 2025, outside a 2024 report
        let report = MonthlyTotalsReport::generate(&storage, 2024).unwrap();
        assert_eq!(report.total_expected(), 0.0);

        let next = MonthlyTotalsReport::generate(&storage, 2025).unwrap();
        assert_eq!(next.months[1].expected, 10000.0);
    }
}
