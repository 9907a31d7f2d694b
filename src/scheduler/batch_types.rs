//! Types for batch processing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::detection::{ExtractedText, FileCategory, PIIDetection};
use crate::masking::{MaskingError, MaskingRequest};

/// What to do with one file.
#[derive(Debug, Clone)]
pub enum JobAction {
    Detect,
    /// Detect, then mask into the output directory.
    Mask(MaskingRequest),
}

#[derive(Debug, Clone)]
pub struct FileJob {
    pub path: PathBuf,
    /// Inferred from the extension when absent.
    pub category: Option<FileCategory>,
    pub action: JobAction,
}

impl FileJob {
    pub fn detect(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), category: None, action: JobAction::Detect }
    }

    pub fn mask(path: impl Into<PathBuf>, request: MaskingRequest) -> Self {
        Self { path: path.into(), category: None, action: JobAction::Mask(request) }
    }

    pub fn with_category(mut self, category: FileCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// Outcome for one file. Failures carry `error` and never abort the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    pub path: PathBuf,
    pub category: Option<FileCategory>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub detections: Vec<PIIDetection>,
    pub masked: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar: Option<PathBuf>,
}

impl FileResult {
    pub(crate) fn ok(path: PathBuf, category: FileCategory) -> Self {
        Self {
            path,
            category: Some(category),
            success: true,
            error: None,
            error_code: None,
            detections: Vec::new(),
            masked: 0,
            skipped: 0,
            output: None,
            sidecar: None,
        }
    }

    pub(crate) fn failed(path: PathBuf, category: Option<FileCategory>, code: &str, reason: impl Into<String>) -> Self {
        Self {
            path,
            category,
            success: false,
            error: Some(reason.into()),
            error_code: Some(code.to_string()),
            detections: Vec::new(),
            masked: 0,
            skipped: 0,
            output: None,
            sidecar: None,
        }
    }
}

/// Progress snapshot. `completed` never decreases within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One entry per job, in submission order.
    pub results: Vec<FileResult>,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn total_detections(&self) -> usize {
        self.results.iter().map(|r| r.detections.len()).sum()
    }
}

/// Text extraction for formats the core does not parse itself.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path, category: FileCategory) -> Result<ExtractedText, MaskingError>;
}
