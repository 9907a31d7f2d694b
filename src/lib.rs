//! PII-CORE - detection, classification and masking of personally
//! identifiable information in extracted document text.
//!
//! Pipeline: extracted text -> [`detection::PatternRegistry`] ->
//! [`detection::ContextScorer`] -> [`detection::DocumentClassifier`]
//! (richer document types only) -> [`detection::dedupe`] ->
//! [`masking`] on demand -> [`masking::DecryptPipeline`] on demand.
//!
//! Registries and validators are built once and shared read-only; every
//! other value is owned by a single detection or masking call.

pub mod config;
pub mod crypto;
pub mod detection;
pub mod error;
pub mod masking;
pub mod scheduler;
pub mod telemetry;

pub use config::CoreConfig;
pub use detection::{
    DetectionPolicy, ExtractedText, FileCategory, PIICategory, PIIDetection, PIIDetector, PIIType,
};
pub use error::{CoreError, CoreResult};
pub use masking::{HashMetaIndex, MaskingRequest, MaskingStrategy};
