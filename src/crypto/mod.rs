//! Password-based reversible encryption of individual PII values.
//!
//! Split into sub-modules:
//! - `encryption_key`: PBKDF2 parameters and key derivation
//! - `encryption_core`: AES-256-GCM cipher bound to one derived key
//! - `token`: the [`EncryptedToken`] wire format and value-level API

mod encryption_core;
mod encryption_key;
mod token;

use thiserror::Error;

pub use encryption_core::{TokenCipher, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use encryption_key::{derive_key, generate_salt, KdfAlgorithm, KdfParams, SALT_SIZE};
pub use token::{decrypt_value, encrypt_value, EncryptedToken, TOKEN_ALGORITHM};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncryptionError {
    /// GCM tag mismatch: wrong password or corrupted ciphertext.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid nonce size: expected {expected} bytes, got {actual}")]
    InvalidNonce { expected: usize, actual: usize },

    #[error("Invalid token encoding: {0}")]
    InvalidEncoding(String),

    #[error("Unsupported token parameters: {0}")]
    UnsupportedToken(String),

    #[error("Password must not be empty")]
    EmptyPassword,
}

#[cfg(test)]
#[path = "encryption_tests.rs"]
mod tests;
