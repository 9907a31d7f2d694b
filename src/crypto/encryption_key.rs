//! Key derivation for token encryption.
//!
//! PBKDF2-HMAC with SHA-512 (default for new tokens) or SHA-256 (kept for
//! older artifacts). Every token carries its own random salt.

use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

use super::encryption_core::KEY_SIZE;
use super::EncryptionError;

/// Salt size (128 bits).
pub const SALT_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KdfAlgorithm {
    #[serde(rename = "PBKDF2-SHA256")]
    Pbkdf2Sha256,
    #[serde(rename = "PBKDF2-SHA512")]
    #[default]
    Pbkdf2Sha512,
}

impl KdfAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pbkdf2Sha256 => "PBKDF2-SHA256",
            Self::Pbkdf2Sha512 => "PBKDF2-SHA512",
        }
    }

    /// Accepts the wire name or a bare hash name, any case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "PBKDF2-SHA256" | "SHA256" | "SHA-256" => Some(Self::Pbkdf2Sha256),
            "PBKDF2-SHA512" | "SHA512" | "SHA-512" => Some(Self::Pbkdf2Sha512),
            _ => None,
        }
    }

    /// Iteration count used when an artifact does not record one.
    pub fn standard_iterations(&self) -> u32 {
        match self {
            Self::Pbkdf2Sha256 => 100_000,
            Self::Pbkdf2Sha512 => 150_000,
        }
    }
}

impl std::fmt::Display for KdfAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub algorithm: KdfAlgorithm,
    pub iterations: u32,
}

impl KdfParams {
    pub fn standard(algorithm: KdfAlgorithm) -> Self {
        Self { algorithm, iterations: algorithm.standard_iterations() }
    }
}

impl Default for KdfParams {
    fn default() -> Self { Self::standard(KdfAlgorithm::default()) }
}

/// Derive a 256-bit key. The buffer is wiped on drop.
pub fn derive_key(
    password: &str,
    salt: &[u8],
    params: KdfParams,
) -> Result<Zeroizing<[u8; KEY_SIZE]>, EncryptionError> {
    if password.is_empty() {
        return Err(EncryptionError::EmptyPassword);
    }
    if params.iterations == 0 {
        return Err(EncryptionError::UnsupportedToken("zero KDF iterations".into()));
    }
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    match params.algorithm {
        KdfAlgorithm::Pbkdf2Sha256 => {
            pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, params.iterations, &mut key[..])
        }
        KdfAlgorithm::Pbkdf2Sha512 => {
            pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, params.iterations, &mut key[..])
        }
    }
    Ok(key)
}

/// Fresh random salt from the OS CSPRNG.
pub fn generate_salt() -> [u8; SALT_SIZE] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}
