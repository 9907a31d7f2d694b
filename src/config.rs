//! Configuration: optional TOML file, then environment overrides.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```toml
//! [scoring]
//! context_boost = 0.1
//!
//! [masking]
//! kdf = "PBKDF2-SHA512"
//!
//! [batch]
//! workers = 4
//!
//! [[archetypes]]
//! name = "payslip"
//! keywords = ["payslip", "net pay"]
//! expected_types = ["pan", "bank_account"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::KdfAlgorithm;
use crate::telemetry::LogFormat;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Confidence constants used by the context scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub checksum_pass_confidence: f64,
    pub checksum_fail_confidence: f64,
    pub context_boost: f64,
    pub max_confidence: f64,
    /// Characters inspected on each side of a match.
    pub context_window: usize,
    pub min_match_len: usize,
    /// Detections scored below this are dropped.
    pub min_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            checksum_pass_confidence: 0.95,
            checksum_fail_confidence: 0.65,
            context_boost: 0.10,
            max_confidence: 0.95,
            context_window: 100,
            min_match_len: 2,
            min_confidence: 0.50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingConfig {
    /// KDF for newly created tokens.
    pub kdf: KdfAlgorithm,
    /// Record plaintext in the hash-meta sidecar.
    pub store_original_value: bool,
    /// Pixels added around image mask regions.
    pub image_padding: u32,
    /// Mask height is clamped to this fraction of its width.
    pub image_max_height_ratio: f32,
    pub blur_sigma: f32,
    pub pixelate_block: u32,
    /// Resolution used when rasterizing paginated pages.
    pub render_dpi: u32,
    /// Area fraction above which two redaction rectangles are duplicates.
    pub overlap_threshold: f32,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            kdf: KdfAlgorithm::Pbkdf2Sha512,
            store_original_value: true,
            image_padding: 4,
            image_max_height_ratio: 0.8,
            blur_sigma: 6.0,
            pixelate_block: 10,
            render_dpi: 150,
            overlap_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads; 0 means one per CPU.
    pub workers: usize,
    pub queue_size: usize,
    /// Masked output directory; defaults to next to the input.
    pub output_dir: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { workers: 0, queue_size: 256, output_dir: None }
    }
}

impl BatchConfig {
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 { num_cpus::get().max(1) } else { self.workers }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Human }
    }
}

/// Additional document archetype appended after the built-in catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeConfig {
    pub name: String,
    pub keywords: Vec<String>,
    pub expected_types: Vec<String>,
    #[serde(default)]
    pub max_allowed_count: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub scoring: ScoringConfig,
    pub masking: MaskingConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
    pub archetypes: Vec<ArchetypeConfig>,
}

impl CoreConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `PII_CORE_*` overrides from `lookup` (normally the process
    /// environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PII_CORE_WORKERS") {
            self.batch.workers = v.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PII_CORE_WORKERS".into(),
                reason: format!("not a worker count: {}", v),
            })?;
        }
        if let Some(v) = lookup("PII_CORE_LOG_LEVEL") {
            self.logging.level = v.trim().to_string();
        }
        if let Some(v) = lookup("PII_CORE_LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&v).ok_or_else(|| ConfigError::Invalid {
                key: "PII_CORE_LOG_FORMAT".into(),
                reason: format!("expected human or json, got {}", v),
            })?;
        }
        if let Some(v) = lookup("PII_CORE_KDF") {
            self.masking.kdf = KdfAlgorithm::parse(&v).ok_or_else(|| ConfigError::Invalid {
                key: "PII_CORE_KDF".into(),
                reason: format!("unknown KDF {}", v),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        for (key, value) in [
            ("scoring.checksum_pass_confidence", s.checksum_pass_confidence),
            ("scoring.checksum_fail_confidence", s.checksum_fail_confidence),
            ("scoring.context_boost", s.context_boost),
            ("scoring.max_confidence", s.max_confidence),
            ("scoring.min_confidence", s.min_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(key, format!("{} is outside [0, 1]", value)));
            }
        }
        if s.checksum_fail_confidence >= s.checksum_pass_confidence {
            return Err(invalid("scoring.checksum_fail_confidence", "must be below the pass tier".into()));
        }
        if s.context_window == 0 {
            return Err(invalid("scoring.context_window", "must be positive".into()));
        }

        let m = &self.masking;
        if m.image_max_height_ratio.is_nan() || m.image_max_height_ratio <= 0.0 {
            return Err(invalid("masking.image_max_height_ratio", "must be positive".into()));
        }
        if m.blur_sigma.is_nan() || m.blur_sigma <= 0.0 {
            return Err(invalid("masking.blur_sigma", "must be positive".into()));
        }
        if m.pixelate_block == 0 || m.render_dpi == 0 {
            return Err(invalid("masking.pixelate_block/render_dpi", "must be positive".into()));
        }
        if !(0.0..=1.0).contains(&m.overlap_threshold) {
            return Err(invalid("masking.overlap_threshold", "must be within [0, 1]".into()));
        }
        if self.batch.queue_size == 0 {
            return Err(invalid("batch.queue_size", "must be positive".into()));
        }
        for a in &self.archetypes {
            if a.name.trim().is_empty() || a.keywords.is_empty() || a.expected_types.is_empty() {
                return Err(invalid("archetypes", format!("archetype '{}' is incomplete", a.name)));
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: String) -> ConfigError {
    ConfigError::Invalid { key: key.to_string(), reason }
}

/// Load `path` if given (missing file is an error), apply environment
/// overrides, and validate.
pub fn load(path: Option<&Path>) -> Result<CoreConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)
                .map_err(|source| ConfigError::Read { path: p.to_path_buf(), source })?;
            CoreConfig::from_toml(&content)?
        }
        None => CoreConfig::default(),
    };
    config.apply_overrides(|k| std::env::var(k).ok())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
