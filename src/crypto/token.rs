//! Encrypted-token wire format.
//!
//! ```json
//! {"salt": "<b64>", "iv": "<b64>", "ciphertext": "<b64>",
//!  "algorithm": "AES-GCM-256", "kdf": "PBKDF2-SHA512", "iterations": 150000}
//! ```
//!
//! Salt and IV are fresh for every call, so encrypting one value twice
//! never yields the same ciphertext.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::encryption_core::{TokenCipher, NONCE_SIZE};
use super::encryption_key::{generate_salt, KdfAlgorithm, KdfParams};
use super::EncryptionError;

pub const TOKEN_ALGORITHM: &str = "AES-GCM-256";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedToken {
    pub salt: String,
    pub iv: String,
    pub ciphertext: String,
    pub algorithm: String,
    pub kdf: KdfAlgorithm,
    pub iterations: u32,
}

impl EncryptedToken {
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams { algorithm: self.kdf, iterations: self.iterations }
    }

    /// Short non-reversible identifier for logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.ciphertext.as_bytes());
        hex::encode(&digest[..6])
    }
}

/// Encrypt `plaintext` under a key derived from `password` and a fresh salt.
pub fn encrypt_value(plaintext: &str, password: &str, params: KdfParams) -> Result<EncryptedToken, EncryptionError> {
    let salt = generate_salt();
    let cipher = TokenCipher::from_password(password, &salt, params)?;
    let (iv, ciphertext) = cipher.encrypt(plaintext.as_bytes())?;
    Ok(EncryptedToken {
        salt: BASE64.encode(salt),
        iv: BASE64.encode(iv),
        ciphertext: BASE64.encode(ciphertext),
        algorithm: TOKEN_ALGORITHM.to_string(),
        kdf: params.algorithm,
        iterations: params.iterations,
    })
}

/// Reverse [`encrypt_value`]. A wrong password yields
/// [`EncryptionError::AuthenticationFailed`].
pub fn decrypt_value(token: &EncryptedToken, password: &str) -> Result<String, EncryptionError> {
    if token.algorithm != TOKEN_ALGORITHM {
        return Err(EncryptionError::UnsupportedToken(format!("algorithm {}", token.algorithm)));
    }
    let salt = decode("salt", &token.salt)?;
    let iv = decode("iv", &token.iv)?;
    let ciphertext = decode("ciphertext", &token.ciphertext)?;
    if iv.len() != NONCE_SIZE {
        return Err(EncryptionError::InvalidNonce { expected: NONCE_SIZE, actual: iv.len() });
    }

    let cipher = TokenCipher::from_password(password, &salt, token.kdf_params())?;
    let plaintext = cipher.decrypt(&iv, &ciphertext)?;
    String::from_utf8(plaintext).map_err(|_| EncryptionError::InvalidEncoding("plaintext is not UTF-8".into()))
}

fn decode(field: &str, value: &str) -> Result<Vec<u8>, EncryptionError> {
    BASE64
        .decode(value.trim())
        .map_err(|e| EncryptionError::InvalidEncoding(format!("{}: {}", field, e)))
}
