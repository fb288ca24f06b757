//! Salted password hashing for admin credentials
//!
//! Stored format: `base64(salt):base64(hex(sha256(salt || password)))`,
//! with a fresh 16-byte random salt per hash. A stored value with no `:`
//! separator is treated as legacy plaintext and compared directly; that
//! path exists only for migrating pre-hash rows and is not a security
//! property.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Size of the per-hash salt in bytes
const SALT_SIZE: usize = 16;

/// Hash a password with a freshly generated salt
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);

    let digest_hex = salted_digest_hex(&salt, password);
    format!(
        "{}:{}",
        STANDARD.encode(salt),
        STANDARD.encode(digest_hex.as_bytes())
    )
}

/// Verify a password against a stored hash
///
/// Malformed stored values (bad base64, wrong part count) verify false,
/// never error. Comparison is constant-time.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_part, hash_part)) = stored.split_once(':') else {
        // Legacy plaintext row
        return stored.as_bytes().ct_eq(password.as_bytes()).into();
    };

    let Ok(salt) = STANDARD.decode(salt_part) else {
        return false;
    };

    let digest_hex = salted_digest_hex(&salt, password);
    let expected = STANDARD.encode(digest_hex.as_bytes());

    expected.as_bytes().ct_eq(hash_part.as_bytes()).into()
}

/// Hex-encoded SHA-256 of salt || password
fn salted_digest_hex(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
