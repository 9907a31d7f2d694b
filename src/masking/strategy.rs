//! Masking strategies and requests.

use serde::{Deserialize, Serialize};

use super::MaskingError;
use crate::detection::{PIIDetection, PIIType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskingStrategy {
    /// Solid fill.
    Blackout,
    /// Password-based reversible encryption.
    Hash,
    /// Gaussian blur.
    Blur,
    /// Block-average pixelation.
    Pixelate,
}

impl MaskingStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blackout" | "redact" | "black" => Some(Self::Blackout),
            "hash" | "encrypt" => Some(Self::Hash),
            "blur" => Some(Self::Blur),
            "pixelate" | "pixel" => Some(Self::Pixelate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blackout => "blackout",
            Self::Hash => "hash",
            Self::Blur => "blur",
            Self::Pixelate => "pixelate",
        }
    }

    pub fn is_reversible(&self) -> bool {
        matches!(self, Self::Hash)
    }

    /// Character repeated over a span in text formats, where blur and
    /// pixelation have no pixels to act on.
    pub fn redaction_char(&self) -> char {
        match self {
            Self::Blackout | Self::Hash => '█',
            Self::Blur => '▒',
            Self::Pixelate => '▓',
        }
    }
}

impl std::fmt::Display for MaskingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingRequest {
    pub strategy: MaskingStrategy,
    /// Restrict masking to these types; `None` masks every detection.
    #[serde(default)]
    pub target_types: Option<Vec<PIIType>>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl MaskingRequest {
    pub fn new(strategy: MaskingStrategy) -> Self {
        Self { strategy, target_types: None, password: None }
    }

    pub fn hash(password: impl Into<String>) -> Self {
        Self { strategy: MaskingStrategy::Hash, target_types: None, password: Some(password.into()) }
    }

    pub fn with_types(mut self, types: Vec<PIIType>) -> Self {
        self.target_types = Some(types);
        self
    }

    /// A non-empty password is required for `hash` and rejected otherwise.
    pub fn validate(&self) -> Result<(), MaskingError> {
        let has_password = self.password.as_deref().is_some_and(|p| !p.is_empty());
        match (self.strategy, has_password) {
            (MaskingStrategy::Hash, false) => Err(MaskingError::MissingPassword),
            (MaskingStrategy::Hash, true) => Ok(()),
            (_, _) if self.password.is_some() => Err(MaskingError::InvalidRequest(format!(
                "password given for irreversible strategy {}",
                self.strategy
            ))),
            _ => Ok(()),
        }
    }

    pub fn targets(&self, pii_type: PIIType) -> bool {
        self.target_types.as_ref().map_or(true, |t| t.contains(&pii_type))
    }

    /// Detections selected by `target_types`.
    pub fn select<'a>(&self, detections: &'a [PIIDetection]) -> Vec<&'a PIIDetection> {
        detections.iter().filter(|d| self.targets(d.pii_type)).collect()
    }

    /// Password for hash masking; only valid after [`validate`](Self::validate).
    pub(crate) fn password(&self) -> Result<&str, MaskingError> {
        self.password.as_deref().filter(|p| !p.is_empty()).ok_or(MaskingError::MissingPassword)
    }
}
