//! AES-256-GCM bound to one derived key.
//!
//! # Security
//! - GCM gives confidentiality and integrity; a wrong key surfaces as
//!   [`EncryptionError::AuthenticationFailed`], never as garbage plaintext
//! - No associated data
//! - Key material is zeroed on drop via `zeroize`

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

use super::encryption_key::{derive_key, KdfParams};
use super::EncryptionError;

/// Encryption key size (256 bits)
pub const KEY_SIZE: usize = 32;
/// Nonce size (96 bits for GCM)
pub const NONCE_SIZE: usize = 12;
/// Tag size (128 bits)
pub const TAG_SIZE: usize = 16;

pub struct TokenCipher {
    key: Zeroizing<[u8; KEY_SIZE]>,
}

impl TokenCipher {
    pub fn new(key: Zeroizing<[u8; KEY_SIZE]>) -> Self {
        Self { key }
    }

    pub fn from_password(password: &str, salt: &[u8], params: KdfParams) -> Result<Self, EncryptionError> {
        Ok(Self::new(derive_key(password, salt, params)?))
    }

    /// Encrypt with a fresh random nonce. Returns (nonce, ciphertext_with_tag).
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<([u8; NONCE_SIZE], Vec<u8>), EncryptionError> {
        let nonce = Self::generate_nonce();
        let ciphertext = self.encrypt_with_nonce(&nonce, plaintext)?;
        Ok((nonce, ciphertext))
    }

    fn encrypt_with_nonce(
        &self,
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, EncryptionError> {
        self.cipher()
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))
    }

    pub fn decrypt(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        if nonce.len() != NONCE_SIZE {
            return Err(EncryptionError::InvalidNonce { expected: NONCE_SIZE, actual: nonce.len() });
        }
        self.cipher()
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| EncryptionError::AuthenticationFailed)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(self.key.as_slice()))
    }

    fn generate_nonce() -> [u8; NONCE_SIZE] {
        use rand::RngCore;
        let mut nonce = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce);
        nonce
    }
}
