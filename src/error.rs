//! Crate-level error taxonomy.
//!
//! Input and validation problems never reach this type: detection folds
//! them into empty results or lower confidence. What remains is grouped by
//! origin so the batch layer can decide between skipping a file and
//! aborting at startup.

use thiserror::Error;

use crate::config::ConfigError;
use crate::crypto::EncryptionError;
use crate::detection::RegistryError;
use crate::masking::MaskingError;
use crate::scheduler::PoolError;

/// Result alias used across the public API.
pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Pattern registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Cryptographic error: {0}")]
    Encryption(#[from] EncryptionError),

    #[error("Masking error: {0}")]
    Masking(#[from] MaskingError),

    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

impl CoreError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Registry(_) => "PII_REGISTRY",
            Self::Encryption(EncryptionError::AuthenticationFailed) => "PII_DECRYPTION_FAILED",
            Self::Encryption(_) => "PII_CRYPTO",
            Self::Masking(_) => "PII_MASKING",
            Self::Pool(_) => "PII_POOL",
            Self::Config(_) => "PII_CONFIG",
            Self::Io(_) => "PII_IO",
            Self::UnsupportedFormat(_) => "PII_UNSUPPORTED_FORMAT",
        }
    }

    /// Whether the failure is scoped to one file. Registry and config
    /// failures are startup-fatal; everything else skips the file.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Registry(_) | Self::Config(_))
    }
}
