//! Deterministic encryption of stored monetary amounts
//!
//! Amounts are canonicalized to two decimal places, encrypted with
//! AES-256-GCM under a key derived by hashing a fixed compiled-in
//! passphrase, and transported as standard base64. The nonce is fixed, so
//! the same amount always yields the literal-identical ciphertext; that
//! determinism is relied on by the stored column's in-place migration and
//! must not be "fixed" by introducing a per-record nonce.
//!
//! Decryption is fail-soft: any failure yields 0.0 rather than an error,
//! so a single corrupt row cannot fault an entire report aggregation.
//! Callers that must distinguish corruption from a legitimate zero check
//! [`AmountCipher::is_encrypted`] first.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::{BursarError, BursarResult};
use crate::models::amount::format_amount;

/// Fixed passphrase the storage key is derived from. Embedded in the
/// binary; there is no external key management in this design.
const STATIC_PASSPHRASE: &str = "bursar-payables-at-rest";

/// Fixed 96-bit nonce. Reused for every record to keep ciphertext
/// deterministic.
const FIXED_NONCE: [u8; 12] = *b"student-fees";

/// Cipher for monetary values stored as opaque strings
pub struct AmountCipher {
    /// AES-256 key, SHA-256 digest of the fixed passphrase
    key: [u8; 32],
}

impl AmountCipher {
    /// Create a cipher keyed from the compiled-in passphrase
    pub fn new() -> Self {
        Self::with_passphrase(STATIC_PASSPHRASE)
    }

    /// Create a cipher keyed from an explicit passphrase (tests)
    pub fn with_passphrase(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    fn cipher(&self) -> BursarResult<Aes256Gcm> {
        Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| BursarError::Encryption(format!("Failed to create cipher: {}", e)))
    }

    /// Encrypt an amount to its opaque stored form
    ///
    /// The plaintext is the amount formatted to exactly two decimal
    /// places, so equal amounts always produce equal ciphertext.
    pub fn encrypt(&self, amount: f64) -> BursarResult<String> {
        let plaintext = format_amount(amount);
        let nonce = Nonce::from_slice(&FIXED_NONCE);

        let ciphertext = self
            .cipher()?
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| BursarError::Encryption(format!("Encryption failed: {}", e)))?;

        Ok(STANDARD.encode(ciphertext))
    }

    /// Decrypt an opaque stored value back to an amount
    ///
    /// Fail-soft: bad encoding, authentication failure, or non-numeric
    /// plaintext all yield 0.0, logged at warn.
    pub fn decrypt(&self, stored: &str) -> f64 {
        match self.try_decrypt(stored) {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(error = %e, "failed to decrypt stored amount, reading as 0.00");
                0.0
            }
        }
    }

    fn try_decrypt(&self, stored: &str) -> BursarResult<f64> {
        let ciphertext = STANDARD
            .decode(stored)
            .map_err(|e| BursarError::Encryption(format!("Invalid ciphertext encoding: {}", e)))?;

        let nonce = Nonce::from_slice(&FIXED_NONCE);
        let plaintext = self
            .cipher()?
            .decrypt(nonce, ciphertext.as_ref())
            .map_err(|_| {
                BursarError::Encryption("Decryption failed: wrong key or corrupted data".into())
            })?;

        let text = String::from_utf8(plaintext)
            .map_err(|e| BursarError::Encryption(format!("Invalid UTF-8 in plaintext: {}", e)))?;

        text.parse::<f64>()
            .map_err(|_| BursarError::Encryption(format!("Non-numeric plaintext: {}", text)))
    }

    /// Whether a stored value holds ciphertext rather than a plain number
    ///
    /// A string that parses as a decimal number is plaintext; otherwise it
    /// counts as encrypted if it decodes as base64. This lets a column be
    /// migrated in place from plaintext-number storage without a schema
    /// flag.
    pub fn is_encrypted(&self, stored: &str) -> bool {
        if stored.trim().parse::<f64>().is_ok() {
            return false;
        }
        STANDARD.decode(stored).is_ok()
    }

    /// Read a stored value that may be legacy plaintext or ciphertext
    pub fn read_stored(&self, stored: &str) -> f64 {
        if self.is_encrypted(stored) {
            self.decrypt(stored)
        } else {
            stored.trim().parse::<f64>().unwrap_or_else(|_| {
                tracing::warn!(value = stored, "unreadable stored amount, reading as 0.00");
                0.0
            })
        }
    }
}

impl Default for AmountCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AmountCipher {
    fn clone(&self) -> Self {
        Self { key: self.key }
    }
}

impl Drop for AmountCipher {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::amount::round2;

    #[test]
    fn test_round_trip_canonicalizes_to_two_decimals() {
        let cipher = AmountCipher::new();
        for amount in [0.0, 20000.0, 50000.0, 123.456, 0.005, 99999.99] {
            let stored = cipher.encrypt(amount).unwrap();
            assert_eq!(cipher.decrypt(&stored), round2(amount));
        }
    }

    #[test]
    fn test_deterministic_ciphertext() {
        let cipher = AmountCipher::new();
        let first = cipher.encrypt(1234.56).unwrap();
        let second = cipher.encrypt(1234.56).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_amounts_distinct_ciphertext() {
        let cipher = AmountCipher::new();
        assert_ne!(
            cipher.encrypt(100.0).unwrap(),
            cipher.encrypt(100.01).unwrap()
        );
    }

    #[test]
    fn test_decrypt_garbage_yields_zero() {
        let cipher = AmountCipher::new();
        assert_eq!(cipher.decrypt("not base64 at all!!!"), 0.0);
        // Valid base64 but not a valid ciphertext
        assert_eq!(cipher.decrypt("aGVsbG8gd29ybGQ="), 0.0);
    }

    #[test]
    fn test_decrypt_wrong_key_yields_zero() {
        let cipher = AmountCipher::new();
        let other = AmountCipher::with_passphrase("some other passphrase");
        let stored = cipher.encrypt(500.0).unwrap();
        assert_eq!(other.decrypt(&stored), 0.0);
    }

    #[test]
    fn test_is_encrypted() {
        let cipher = AmountCipher::new();

        // Plain numbers are not encrypted
        assert!(!cipher.is_encrypted("50000.00"));
        assert!(!cipher.is_encrypted("-12.5"));
        assert!(!cipher.is_encrypted("0"));

        // Real ciphertext is
        let stored = cipher.encrypt(50000.0).unwrap();
        assert!(cipher.is_encrypted(&stored));

        // Neither a number nor base64
        assert!(!cipher.is_encrypted("hello world!"));
    }

    #[test]
    fn test_read_stored_accepts_legacy_plaintext() {
        let cipher = AmountCipher::new();
        assert_eq!(cipher.read_stored("1500.00"), 1500.0);

        let stored = cipher.encrypt(1500.0).unwrap();
        assert_eq!(cipher.read_stored(&stored), 1500.0);
    }
}
