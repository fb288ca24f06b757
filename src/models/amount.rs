//! Canonical handling of monetary amounts
//!
//! Amounts are IEEE-754 doubles throughout the ledger; the tolerance rules
//! (0.001 over-payment slack, 0.01 paid-in-full tolerance) are defined
//! over doubles, and stored values are canonicalized to two decimal
//! places before encryption so identical amounts always produce identical
//! ciphertext.

use crate::error::{BursarError, BursarResult};

/// Round an amount to two decimal places
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format an amount with exactly two decimal places
///
/// This is the canonical plaintext form fed to the amount cipher.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Parse a user-entered amount string
///
/// Accepts optional leading currency symbol and thousands separators.
/// Non-numeric input is an [`BursarError::InvalidAmount`].
pub fn parse_amount(s: &str) -> BursarResult<f64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches(['P', 'p', '$'])
        .chars()
        .filter(|c| *c != ',')
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| BursarError::InvalidAmount(format!("not a number: {}", s)))
}
