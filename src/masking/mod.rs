//! Redaction and reversible encryption of detected PII.
//!
//! One [`Masker`] applies a [`MaskingStrategy`] to four document shapes:
//! - `text`: plain text and tabular text, with a hash-meta sidecar
//! - `word`: paragraph, table-cell and header/footer blocks
//! - `paginated`: positioned redaction annotations plus a raster pass
//! - `image`: bounding-box regions on a [`Raster`]
//!
//! Masking is not idempotent: masking a masked document encrypts the
//! tokens again. Callers mask a document once per export.

pub mod decrypt;
mod font;
pub mod image;
pub mod meta;
pub mod paginated;
pub mod raster;
pub mod strategy;
pub mod text;
pub mod variants;
pub mod word;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MaskingConfig;
use crate::crypto::{encrypt_value, EncryptedToken, EncryptionError, KdfParams};
use crate::detection::PIIType;

pub use decrypt::{DecryptOutcome, DecryptPipeline, DecryptStatus};
pub use image::MaskedImage;
pub use meta::{HashMeta, HashMetaEntry, HashMetaIndex};
pub use paginated::{PageModel, PaginatedDocument, TextInstance};
pub use raster::{Raster, Rgb};
pub use strategy::{MaskingRequest, MaskingStrategy};
pub use text::MaskedText;
pub use variants::{value_variants, VariantMatcher};
pub use word::{BlockKind, WordDocument, WordModel};

#[derive(Error, Debug)]
pub enum MaskingError {
    #[error("Invalid masking request: {0}")]
    InvalidRequest(String),

    #[error("Hash masking requires a non-empty password")]
    MissingPassword,

    #[error("Encryption error: {0}")]
    Encryption(#[from] EncryptionError),

    #[error("Document error: {0}")]
    Document(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sidecar serialization error: {0}")]
    Sidecar(#[from] serde_json::Error),
}

/// An occurrence that could not be masked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedOccurrence {
    pub pii_type: PIIType,
    pub page: u32,
    pub reason: String,
}

/// Per-call masking summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskReport {
    /// Occurrences masked.
    pub masked: usize,
    pub skipped: Vec<SkippedOccurrence>,
    /// Key material for every hash-masked occurrence; empty otherwise.
    pub meta: HashMetaIndex,
}

impl MaskReport {
    pub(crate) fn skip(&mut self, pii_type: PIIType, page: u32, reason: impl Into<String>) {
        self.skipped.push(SkippedOccurrence { pii_type, page, reason: reason.into() });
    }
}

/// Applies masking requests with one configuration.
#[derive(Debug, Clone)]
pub struct Masker {
    config: MaskingConfig,
    kdf: KdfParams,
}

impl Masker {
    pub fn new(config: MaskingConfig) -> Self {
        let kdf = KdfParams::standard(config.kdf);
        Self { config, kdf }
    }

    /// Override KDF parameters for new tokens.
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn config(&self) -> &MaskingConfig { &self.config }
    pub fn kdf(&self) -> KdfParams { self.kdf }

    /// Encrypt one occurrence and record it in `report.meta`.
    pub(crate) fn encrypt_occurrence(
        &self,
        plaintext: &str,
        password: &str,
        pii_type: PIIType,
        page: u32,
        report: &mut MaskReport,
    ) -> Result<EncryptedToken, MaskingError> {
        let token = encrypt_value(plaintext, password, self.kdf)?;
        let original = self.config.store_original_value.then(|| plaintext.to_string());
        report.meta.insert(&token, original, pii_type, page);
        tracing::trace!(token = %token.fingerprint(), pii_type = %pii_type, page, "Occurrence encrypted");
        Ok(token)
    }
}

impl Default for Masker {
    fn default() -> Self { Self::new(MaskingConfig::default()) }
}
