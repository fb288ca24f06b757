//! Payable ledger service
//!
//! The write side of the tuition ledger: payment entry in accumulate and
//! overwrite mode, payable amount changes, and the status recomputation
//! that follows every mutation. All date-sensitive operations take `today`
//! explicitly; nothing here reads the wall clock for business decisions.

use chrono::{Months, NaiveDate};

use crate::error::{BursarError, BursarResult};
use crate::models::{
    recompute_status, round2, EnrollmentId, EnrollmentLink, FeeSchedule, LedgerRow, PaymentStatus,
    SchoolYearId, SemesterLabel, EXCESS_TOLERANCE,
};
use crate::storage::Storage;

/// How a user-entered payment figure is applied to the paid amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMode {
    /// The entered figure is added to the existing paid amount
    Accumulate,
    /// The entered figure replaces the existing paid amount
    Overwrite,
}

/// Decrypted snapshot of one ledger row with its derived figures
#[derive(Debug, Clone)]
pub struct LedgerState {
    pub enrollment_id: EnrollmentId,
    pub downpayment: f64,
    pub amount_paid: f64,
    pub total_payable: f64,
    pub remaining_balance: f64,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
}

/// Filter for ledger listings; unset fields match everything
#[derive(Debug, Default, Clone)]
pub struct LedgerFilter {
    school_year: Option<SchoolYearId>,
    semester: Option<SemesterLabel>,
    status: Option<PaymentStatus>,
}

impl LedgerFilter {
    /// Match everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one school year
    pub fn school_year(mut self, id: SchoolYearId) -> Self {
        self.school_year = Some(id);
        self
    }

    /// Restrict to one semester
    pub fn semester(mut self, semester: SemesterLabel) -> Self {
        self.semester = Some(semester);
        self
    }

    /// Restrict to one payment status (evaluated after recomputation)
    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Service for payable ledger mutations and queries
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a payment in the given mode
    pub fn record_payment(
        &self,
        enrollment_id: EnrollmentId,
        amount: f64,
        mode: PaymentMode,
        today: NaiveDate,
    ) -> BursarResult<LedgerState> {
        match mode {
            PaymentMode::Accumulate => self.accumulate(enrollment_id, amount, today),
            PaymentMode::Overwrite => self.overwrite(enrollment_id, amount, today),
        }
    }

    /// Add a payment delta to the paid amount
    ///
    /// Rejects non-positive deltas, and deltas that would push the paid
    /// amount past the total payable by more than the floating-point
    /// slack; a rejected payment leaves the stored row untouched. A
    /// payment landing inside the slack is clamped to exactly the total.
    pub fn accumulate(
        &self,
        enrollment_id: EnrollmentId,
        delta: f64,
        today: NaiveDate,
    ) -> BursarResult<LedgerState> {
        if !delta.is_finite() || delta <= 0.0 {
            return Err(BursarError::InvalidAmount(format!(
                "Payment must be a positive amount, got {}",
                delta
            )));
        }

        let (link, schedule) = self.require_active_link(enrollment_id)?;
        let total_payable = self.require_payable(&link, &schedule)?;

        let mut row = self.row_or_fresh(enrollment_id)?;

        // Slack check runs on the raw sum; rounding first would widen the
        // rejection threshold to half a centavo
        let attempted = row.amount_paid + delta;
        if attempted > total_payable + EXCESS_TOLERANCE {
            return Err(BursarError::ExceedsPayable {
                attempted,
                total_payable,
            });
        }

        // First payment on a fresh row doubles as the downpayment
        if row.amount_paid == 0.0 && row.downpayment == 0.0 {
            row.downpayment = round2(delta).min(total_payable);
        }

        row.amount_paid = if attempted > total_payable {
            total_payable
        } else {
            round2(attempted).min(total_payable)
        };

        self.finalize(&mut row, total_payable, today)?;

        tracing::info!(
            enrollment = %enrollment_id,
            delta,
            amount_paid = row.amount_paid,
            status = %row.status,
            "payment accumulated"
        );

        Ok(self.snapshot(&row, total_payable, today))
    }

    /// Replace the paid amount with a new absolute figure
    ///
    /// Zero is allowed (it resets the row to unpaid); negative figures
    /// and figures past the total payable are rejected.
    pub fn overwrite(
        &self,
        enrollment_id: EnrollmentId,
        new_total: f64,
        today: NaiveDate,
    ) -> BursarResult<LedgerState> {
        if !new_total.is_finite() || new_total < 0.0 {
            return Err(BursarError::InvalidAmount(format!(
                "Paid amount cannot be negative, got {}",
                new_total
            )));
        }

        let (link, schedule) = self.require_active_link(enrollment_id)?;
        let total_payable = self.require_payable(&link, &schedule)?;

        // Same raw-value slack check as accumulate
        if new_total > total_payable + EXCESS_TOLERANCE {
            return Err(BursarError::ExceedsPayable {
                attempted: new_total,
                total_payable,
            });
        }

        let mut row = self.row_or_fresh(enrollment_id)?;

        if row.amount_paid == 0.0 && row.downpayment == 0.0 && new_total > 0.0 {
            row.downpayment = round2(new_total).min(total_payable);
        }

        row.amount_paid = if new_total > total_payable {
            total_payable
        } else {
            round2(new_total).min(total_payable)
        };

        self.finalize(&mut row, total_payable, today)?;

        tracing::info!(
            enrollment = %enrollment_id,
            amount_paid = row.amount_paid,
            status = %row.status,
            "payment overwritten"
        );

        Ok(self.snapshot(&row, total_payable, today))
    }

    /// Replace the term amounts of an enrollment's fee schedule
    ///
    /// The ledger row (if one exists) is re-persisted with its status
    /// recomputed against the new total. Lowering the payables below the
    /// paid amount is allowed; the row simply becomes PAID with a zero
    /// remaining balance.
    pub fn set_payable_amounts(
        &self,
        enrollment_id: EnrollmentId,
        first: f64,
        second: f64,
        summer: f64,
        today: NaiveDate,
    ) -> BursarResult<()> {
        for amount in [first, second, summer] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(BursarError::InvalidAmount(format!(
                    "Payable amount cannot be negative, got {}",
                    amount
                )));
            }
        }

        let (link, mut schedule) = self.require_active_link(enrollment_id)?;

        schedule.set_amounts(first, second, summer);
        let total_payable = schedule.total_payable();
        self.storage.fee_schedules.upsert(schedule)?;
        self.storage.fee_schedules.save()?;

        if let Some(mut row) = self.storage.ledger.get(enrollment_id)? {
            self.finalize(&mut row, total_payable, today)?;
        }

        tracing::info!(
            enrollment = %link.id,
            total_payable,
            "payable amounts updated"
        );
        Ok(())
    }

    /// Remaining balance for an enrollment (zero when no row exists yet)
    pub fn remaining_balance(&self, enrollment_id: EnrollmentId) -> BursarResult<f64> {
        let (link, schedule) = self.require_link(enrollment_id)?;
        let total_payable = schedule.total_payable();

        Ok(match self.storage.ledger.get(link.id)? {
            Some(row) => row.remaining_balance(total_payable),
            None => total_payable,
        })
    }

    /// Current state of an enrollment's ledger row
    ///
    /// Status is recomputed against `today`, never read back from the
    /// stored column. An enrollment with no row yet reads as an unpaid
    /// row with the full total outstanding.
    pub fn state(&self, enrollment_id: EnrollmentId, today: NaiveDate) -> BursarResult<LedgerState> {
        let (link, schedule) = self.require_link(enrollment_id)?;
        let total_payable = schedule.total_payable();

        let row = match self.storage.ledger.get(link.id)? {
            Some(row) => row,
            None => LedgerRow::new(link.id),
        };

        Ok(self.snapshot(&row, total_payable, today))
    }

    /// List ledger states matching a filter
    ///
    /// Rows are joined through their enrollment link; withdrawn links are
    /// skipped. Status filtering applies to the recomputed status.
    pub fn list(&self, filter: &LedgerFilter, today: NaiveDate) -> BursarResult<Vec<LedgerState>> {
        let mut states = Vec::new();

        for row in self.storage.ledger.get_all()? {
            let Some(link) = self.storage.enrollments.get(row.enrollment_id)? else {
                continue;
            };
            if !link.active {
                continue;
            }
            if let Some(year) = filter.school_year {
                if link.school_year_id != year {
                    continue;
                }
            }

            let Some(schedule) = self.storage.fee_schedules.get(link.fee_schedule_id)? else {
                continue;
            };
            if let Some(semester) = filter.semester {
                if schedule.semester_label() != Some(semester) {
                    continue;
                }
            }

            let state = self.snapshot(&row, schedule.total_payable(), today);
            if let Some(status) = filter.status {
                if state.status != status {
                    continue;
                }
            }

            states.push(state);
        }

        Ok(states)
    }

    /// Recompute status and due date, then persist the row
    fn finalize(
        &self,
        row: &mut LedgerRow,
        total_payable: f64,
        today: NaiveDate,
    ) -> BursarResult<()> {
        row.status = recompute_status(row.amount_paid, total_payable, row.due_date, today);

        if row.status == PaymentStatus::Paid {
            row.due_date = None;
        } else if row.due_date.is_none() {
            // checked_add_months only fails past year 262143
            row.due_date = today.checked_add_months(Months::new(2));
            row.status = recompute_status(row.amount_paid, total_payable, row.due_date, today);
        }

        row.touch();
        self.storage.ledger.upsert(row, total_payable)?;
        self.storage.ledger.save()
    }

    fn snapshot(&self, row: &LedgerRow, total_payable: f64, today: NaiveDate) -> LedgerState {
        LedgerState {
            enrollment_id: row.enrollment_id,
            downpayment: row.downpayment,
            amount_paid: row.amount_paid,
            total_payable,
            remaining_balance: row.remaining_balance(total_payable),
            status: recompute_status(row.amount_paid, total_payable, row.due_date, today),
            due_date: row.due_date,
        }
    }

    fn row_or_fresh(&self, enrollment_id: EnrollmentId) -> BursarResult<LedgerRow> {
        Ok(self
            .storage
            .ledger
            .get(enrollment_id)?
            .unwrap_or_else(|| LedgerRow::new(enrollment_id)))
    }

    fn require_link(
        &self,
        enrollment_id: EnrollmentId,
    ) -> BursarResult<(EnrollmentLink, FeeSchedule)> {
        let link = self
            .storage
            .enrollments
            .get(enrollment_id)?
            .ok_or_else(|| BursarError::link_not_found(enrollment_id.to_string()))?;

        let schedule = self
            .storage
            .fee_schedules
            .get(link.fee_schedule_id)?
            .ok_or_else(|| BursarError::fee_schedule_not_found(link.fee_schedule_id.to_string()))?;

        Ok((link, schedule))
    }

    fn require_active_link(
        &self,
        enrollment_id: EnrollmentId,
    ) -> BursarResult<(EnrollmentLink, FeeSchedule)> {
        let (link, schedule) = self.require_link(enrollment_id)?;
        if !link.active {
            return Err(BursarError::link_not_found(enrollment_id.to_string()));
        }
        Ok((link, schedule))
    }

    fn require_payable(
        &self,
        link: &EnrollmentLink,
        schedule: &FeeSchedule,
    ) -> BursarResult<f64> {
        let total = schedule.total_payable();
        if total <= 0.0 {
            return Err(BursarError::NoPayableDefined {
                enrollment: link.id.to_string(),
            });
        }
        Ok(total)
    }
}
