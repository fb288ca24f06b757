//! At-rest encryption of monetary values and admin credential hashing
//!
//! The amount cipher is deterministic on purpose: the stored column
//! predates any schema flag for ciphertext, so identical amounts must
//! encrypt to identical strings and plaintext legacy values must remain
//! readable. This is a documented weakness, not a pattern to copy.

pub mod amount_cipher;
pub mod credentials;

pub use amount_cipher::AmountCipher;
pub use credentials::{hash_password, verify_password};
