//! Batch processing of files on the worker pool.
//!
//! Each file is an independent task. Results come back over a channel
//! tagged with their submission index; a task that panics never sends,
//! and its slot is filled with a failure once every sender is gone.
//! Progress is reported under one lock so observers see `completed`
//! strictly increase.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

pub use super::batch_types::*;
use super::worker_pool::{WorkerPool, WorkerPoolConfig};
use crate::config::CoreConfig;
use crate::detection::{DetectionPolicy, ExtractedText, FileCategory, PIIDetector};
use crate::error::{CoreError, CoreResult};
use crate::masking::{HashMetaIndex, Masker};

/// Suffix added to the stem of masked output files.
pub const MASKED_SUFFIX: &str = "_masked";

struct BatchContext {
    detector: PIIDetector,
    masker: Masker,
    extractor: Option<Arc<dyn TextExtractor>>,
    output_dir: Option<PathBuf>,
}

pub type ProgressFn = Box<dyn FnMut(BatchProgress) + Send>;

struct ProgressTracker {
    total: usize,
    state: Mutex<(usize, Option<ProgressFn>)>,
}

impl ProgressTracker {
    fn tick(&self) {
        let mut state = self.state.lock();
        state.0 += 1;
        let progress = BatchProgress { completed: state.0, total: self.total };
        if let Some(callback) = state.1.as_mut() {
            callback(progress);
        }
    }
}

pub struct BatchProcessor {
    context: Arc<BatchContext>,
    pool: WorkerPool,
    cancel: Arc<AtomicBool>,
}

impl BatchProcessor {
    pub fn new(config: &CoreConfig, detector: PIIDetector) -> CoreResult<Self> {
        let pool = WorkerPool::new(WorkerPoolConfig::from_batch(&config.batch))?;
        Ok(Self {
            context: Arc::new(BatchContext {
                detector,
                masker: Masker::new(config.masking.clone()),
                extractor: None,
                output_dir: config.batch.output_dir.clone(),
            }),
            pool,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Use `masker` instead of one built from configuration.
    pub fn with_masker(mut self, masker: Masker) -> Self {
        self.update_context(|c| c.masker = masker);
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.update_context(|c| c.extractor = Some(extractor));
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.update_context(|c| c.output_dir = Some(dir));
        self
    }

    fn update_context(&mut self, f: impl FnOnce(&mut BatchContext)) {
        let current = &self.context;
        let mut next = BatchContext {
            detector: current.detector.clone(),
            masker: current.masker.clone(),
            extractor: current.extractor.clone(),
            output_dir: current.output_dir.clone(),
        };
        f(&mut next);
        self.context = Arc::new(next);
    }

    /// Flag checked before each file starts. Files already running finish.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Stop accepting work. Later submissions fail per file with `PII_POOL`.
    pub fn shutdown(&self) {
        self.pool.signal_shutdown();
    }

    pub fn run(&self, jobs: Vec<FileJob>) -> BatchReport {
        self.run_with_progress(jobs, None)
    }

    pub fn run_with_progress(&self, jobs: Vec<FileJob>, progress: Option<ProgressFn>) -> BatchReport {
        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = jobs.len();
        tracing::info!(%batch_id, files = total, "Batch started");

        let tracker = Arc::new(ProgressTracker { total, state: Mutex::new((0, progress)) });
        let (tx, rx) = mpsc::channel::<(usize, FileResult)>();
        let paths: Vec<PathBuf> = jobs.iter().map(|j| j.path.clone()).collect();

        let mut claimed_outputs: HashSet<PathBuf> = HashSet::new();
        for (index, job) in jobs.into_iter().enumerate() {
            if let JobAction::Mask(_) = &job.action {
                let output = masked_output_path(&job.path, self.context.output_dir.as_deref());
                if !claimed_outputs.insert(HashMetaIndex::sidecar_path(&output)) {
                    tracker.tick();
                    let reason = format!("output {} already written by this batch", output.display());
                    let _ = tx.send((index, FileResult::failed(job.path, job.category, "PII_OUTPUT_COLLISION", reason)));
                    continue;
                }
            }
            let context = self.context.clone();
            let cancel = self.cancel.clone();
            let task_tracker = tracker.clone();
            let task_tx = tx.clone();
            let task = Box::new(move || {
                let result = if cancel.load(Ordering::SeqCst) {
                    FileResult::failed(job.path.clone(), job.category, "PII_CANCELLED", "batch cancelled")
                } else {
                    process_job(&context, &job)
                };
                task_tracker.tick();
                let _ = task_tx.send((index, result));
            });
            if let Err(e) = self.pool.submit_wait(task) {
                let err = CoreError::from(e);
                tracker.tick();
                let _ = tx.send((index, FileResult::failed(paths[index].clone(), None, err.code(), err.to_string())));
            }
        }
        drop(tx);

        let mut slots: Vec<Option<FileResult>> = vec![None; total];
        for (index, result) in rx {
            slots[index] = Some(result);
        }
        let results: Vec<FileResult> = slots
            .into_iter()
            .zip(paths)
            .map(|(slot, path)| {
                slot.unwrap_or_else(|| {
                    tracker.tick();
                    FileResult::failed(path, None, "PII_WORKER_PANIC", "worker panicked while processing file")
                })
            })
            .collect();

        let report = BatchReport {
            batch_id,
            started_at,
            finished_at: Utc::now(),
            cancelled: self.cancel.load(Ordering::SeqCst),
            results,
        };
        tracing::info!(
            %batch_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "Batch finished"
        );
        report
    }
}

fn process_job(context: &BatchContext, job: &FileJob) -> FileResult {
    let category = job.category.or_else(|| FileCategory::from_path(&job.path));
    tracing::debug!(path = %job.path.display(), ?category, "Processing file");
    let outcome = match category {
        Some(category) => process_file(context, job, category),
        None => Err(CoreError::UnsupportedFormat(format!("unknown file type: {}", job.path.display()))),
    };
    match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(path = %job.path.display(), code = e.code(), error = %e, "File failed");
            FileResult::failed(job.path.clone(), category, e.code(), e.to_string())
        }
    }
}

fn process_file(context: &BatchContext, job: &FileJob, category: FileCategory) -> CoreResult<FileResult> {
    let input = extract(context, &job.path, category)?;
    let detections = context.detector.detect(&input, DetectionPolicy::for_category(category));
    let mut result = FileResult::ok(job.path.clone(), category);

    if let JobAction::Mask(request) = &job.action {
        if !category.is_text_like() {
            return Err(CoreError::UnsupportedFormat(format!(
                "batch masking covers text formats only, not {:?}",
                category
            )));
        }
        let output = masked_output_path(&job.path, context.output_dir.as_deref());
        let (report, sidecar) = context.masker.mask_text_file(&job.path, &output, &detections, request)?;
        result.masked = report.masked;
        result.skipped = report.skipped.len();
        result.output = Some(output);
        result.sidecar = sidecar;
    }
    result.detections = detections;
    Ok(result)
}

fn extract(context: &BatchContext, path: &Path, category: FileCategory) -> CoreResult<ExtractedText> {
    if category.is_text_like() {
        return Ok(ExtractedText::from_text(std::fs::read_to_string(path)?));
    }
    match &context.extractor {
        Some(extractor) => Ok(extractor.extract(path, category)?),
        None => Err(CoreError::UnsupportedFormat(format!("no text extractor for {:?}", category))),
    }
}

/// `<dir>/<stem>_masked.<ext>`, next to the input unless `output_dir` is set.
pub fn masked_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, MASKED_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, MASKED_SUFFIX),
    };
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
