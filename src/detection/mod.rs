//! PII detection: catalogs, scoring, document classification and
//! deduplication behind a single [`PIIDetector::detect`] entry point.

pub mod classifier;
mod classifier_rules;
pub mod dedup;
pub mod detection_types;
pub mod label_patterns;
pub mod pii_detector;
pub mod pii_patterns;
pub mod pii_types;
pub mod registry;
pub mod scorer;
pub mod validators;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classifier::{filter_by_context, DocumentClassifier, DocumentContext};
pub use dedup::{dedupe, normalize, remove_nested_spans, remove_substring_duplicates};
pub use detection_types::{
    BoundingBox, ExtractedText, Occurrence, PIIDetection, PageText, RawMatch, WordBox,
};
pub use pii_detector::PIIDetector;
pub use pii_types::{PIICategory, PIIType};
pub use registry::PatternRegistry;
pub use scorer::ContextScorer;
pub use validators::{luhn_check, verhoeff_check};

/// Failures while building catalogs. Only raised at startup.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid pattern for {pii_type}: {source}")]
    InvalidPattern {
        pii_type: PIIType,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid keyword set for archetype '{archetype}': {reason}")]
    InvalidKeywords { archetype: String, reason: String },

    #[error("Archetype '{archetype}' expects unknown PII type '{type_name}'")]
    UnknownType { archetype: String, type_name: String },
}

/// Which catalog a scan uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorSelection {
    Generic,
    LabelAnchored,
}

/// How a detection call treats its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionPolicy {
    pub selection: DetectorSelection,
    /// Run document classification and the context filter.
    pub classify: bool,
}

impl DetectionPolicy {
    pub const GENERIC: DetectionPolicy =
        DetectionPolicy { selection: DetectorSelection::Generic, classify: false };
    pub const LABEL_ANCHORED: DetectionPolicy =
        DetectionPolicy { selection: DetectorSelection::LabelAnchored, classify: false };
    pub const CLASSIFIED: DetectionPolicy =
        DetectionPolicy { selection: DetectorSelection::Generic, classify: true };

    pub fn for_category(category: FileCategory) -> Self {
        match category {
            FileCategory::KeyValue => Self::LABEL_ANCHORED,
            FileCategory::PlainText | FileCategory::Tabular => Self::GENERIC,
            FileCategory::Paginated | FileCategory::WordProcessing | FileCategory::Image => {
                Self::CLASSIFIED
            }
        }
    }
}

impl Default for DetectionPolicy {
    fn default() -> Self { Self::GENERIC }
}

/// Caller-supplied source format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    PlainText,
    Tabular,
    KeyValue,
    Paginated,
    WordProcessing,
    Image,
}

impl FileCategory {
    /// Infer from the file extension. `None` for unknown extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::from_extension(&ext)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.') {
            "txt" | "text" | "log" | "md" => Some(Self::PlainText),
            "csv" | "tsv" => Some(Self::Tabular),
            "env" | "ini" | "cfg" | "conf" | "properties" | "yaml" | "yml" | "toml" | "json" => {
                Some(Self::KeyValue)
            }
            "pdf" => Some(Self::Paginated),
            "docx" | "doc" | "odt" => Some(Self::WordProcessing),
            "png" | "jpg" | "jpeg" | "bmp" | "tif" | "tiff" | "webp" => Some(Self::Image),
            _ => None,
        }
    }

    /// Parse a CLI-style name such as `plain_text` or `key-value`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "plain_text" | "text" | "plain" => Some(Self::PlainText),
            "tabular" | "csv" => Some(Self::Tabular),
            "key_value" | "kv" | "config" => Some(Self::KeyValue),
            "paginated" | "pdf" => Some(Self::Paginated),
            "word_processing" | "word" | "docx" => Some(Self::WordProcessing),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    /// Formats whose masked output is text with a hash-meta sidecar.
    pub fn is_text_like(&self) -> bool {
        matches!(self, Self::PlainText | Self::Tabular | Self::KeyValue)
    }
}
