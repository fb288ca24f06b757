//! Payable ledger row and payment status state machine
//!
//! One ledger row exists per enrollment link, created lazily on the first
//! payable or payment entry. The domain form here carries decrypted
//! amounts; the storage layer persists them as opaque ciphertext strings.
//!
//! Status is a pure function of (amount paid, total payable, due date,
//! today) and is recomputed explicitly after every mutation; nothing
//! recomputes it automatically.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::round2;
use super::ids::EnrollmentId;

/// Tolerance under which an amount counts as paid in full.
///
/// Deliberately an order of magnitude looser than [`EXCESS_TOLERANCE`];
/// the two constants come from the source system and are kept distinct.
pub const PAID_TOLERANCE: f64 = 0.01;

/// Floating-point slack allowed past the total payable before a payment
/// is rejected outright. A payment landing inside this slack is clamped
/// to exactly the total; it is never a real overpayment allowance.
pub const EXCESS_TOLERANCE: f64 = 0.001;

/// Payment status of one ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// Nothing paid yet
    Unpaid,
    /// Partially paid
    Partial,
    /// Paid in full (within tolerance)
    Paid,
    /// Not fully paid and the due date has passed
    Overdue,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unpaid => write!(f, "UNPAID"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Paid => write!(f, "PAID"),
            Self::Overdue => write!(f, "OVERDUE"),
        }
    }
}

impl PaymentStatus {
    /// Parse a status from its stored uppercase form
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "UNPAID" => Some(Self::Unpaid),
            "PARTIAL" => Some(Self::Partial),
            "PAID" => Some(Self::Paid),
            "OVERDUE" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// Derive the payment status from current amounts and dates
///
/// PAID takes precedence over OVERDUE unconditionally: a fully paid row is
/// never overdue, whatever its due date says. OVERDUE takes precedence
/// over UNPAID/PARTIAL. Idempotent for unchanged inputs.
pub fn recompute_status(
    amount_paid: f64,
    total_payable: f64,
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> PaymentStatus {
    if total_payable > 0.0 && amount_paid >= total_payable - PAID_TOLERANCE {
        return PaymentStatus::Paid;
    }
    if let Some(due) = due_date {
        if due < today {
            return PaymentStatus::Overdue;
        }
    }
    if amount_paid <= 0.0 {
        PaymentStatus::Unpaid
    } else {
        PaymentStatus::Partial
    }
}

/// One enrollment link's payable ledger row (decrypted domain form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The enrollment link this row bills (1:1)
    pub enrollment_id: EnrollmentId,

    /// Downpayment recorded on first entry
    pub downpayment: f64,

    /// Total amount paid so far
    pub amount_paid: f64,

    /// Current payment status (recomputed on every mutation)
    pub status: PaymentStatus,

    /// Payment due date; cleared when the row becomes PAID
    pub due_date: Option<NaiveDate>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last modified
    pub updated_at: DateTime<Utc>,
}

impl LedgerRow {
    /// Create a fresh, unpaid ledger row
    pub fn new(enrollment_id: EnrollmentId) -> Self {
        let now = Utc::now();
        Self {
            enrollment_id,
            downpayment: 0.0,
            amount_paid: 0.0,
            status: PaymentStatus::Unpaid,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Remaining balance against the given total payable
    ///
    /// Always re-derived; the persisted remaining-balance column is a
    /// cache, never the source of truth.
    pub fn remaining_balance(&self, total_payable: f64) -> f64 {
        round2((total_payable - self.amount_paid).max(0.0))
    }

    /// Touch the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unpaid() {
        let status = recompute_status(0.0, 10000.0, None, date(2025, 6, 1));
        assert_eq!(status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_partial() {
        let status = recompute_status(2500.0, 10000.0, None, date(2025, 6, 1));
        assert_eq!(status, PaymentStatus::Partial);
    }

    #[test]
    fn test_paid_exact() {
        let status = recompute_status(10000.0, 10000.0, None, date(2025, 6, 1));
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn test_paid_within_tolerance() {
        let status = recompute_status(9999.995, 10000.0, None, date(2025, 6, 1));
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn test_overdue_beats_unpaid_and_partial() {
        let today = date(2025, 6, 2);
        let yesterday = date(2025, 6, 1);

        let unpaid = recompute_status(0.0, 10000.0, Some(yesterday), today);
        assert_eq!(unpaid, PaymentStatus::Overdue);

        let partial = recompute_status(500.0, 10000.0, Some(yesterday), today);
        assert_eq!(partial, PaymentStatus::Overdue);
    }

    #[test]
    fn test_paid_beats_overdue() {
        let today = date(2025, 6, 2);
        let yesterday = date(2025, 6, 1);
        let status = recompute_status(10000.0, 10000.0, Some(yesterday), today);
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let today = date(2025, 6, 1);
        let status = recompute_status(500.0, 10000.0, Some(today), today);
        assert_eq!(status, PaymentStatus::Partial);
    }

    #[test]
    fn test_zero_payable_never_paid() {
        let status = recompute_status(0.0, 0.0, None, date(2025, 6, 1));
        assert_eq!(status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_idempotent() {
        let today = date(2025, 6, 1);
        let first = recompute_status(2500.0, 10000.0, None, today);
        let second = recompute_status(2500.0, 10000.0, None, today);
        assert_eq!(first, second);
    }

    #[test]
    fn test_remaining_balance() {
        let mut row = LedgerRow::new(EnrollmentId::new());
        assert_eq!(row.remaining_balance(50000.0), 50000.0);

        row.amount_paid = 20000.0;
        assert_eq!(row.remaining_balance(50000.0), 30000.0);

        // Never negative even if payables were lowered below the paid amount
        row.amount_paid = 60000.0;
        assert_eq!(row.remaining_balance(50000.0), 0.0);
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            PaymentStatus::Unpaid,
            PaymentStatus::Partial,
            PaymentStatus::Paid,
            PaymentStatus::Overdue,
        ] {
            assert_eq!(PaymentStatus::parse(&status.to_string()), Some(status));
        }
        assert_eq!(PaymentStatus::parse("REFUNDED"), None);
    }
}
