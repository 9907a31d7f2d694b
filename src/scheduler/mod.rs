//! Parallel batch processing.
//!
//! Files are processed one per task on a bounded [`WorkerPool`]. Detection
//! and masking state is local to a task; only the progress counter is
//! shared across workers.

pub mod batch;
mod batch_types;
pub mod worker_pool;
mod worker_pool_types;

pub use batch::{
    masked_output_path, BatchProcessor, BatchProgress, BatchReport, FileJob, FileResult, JobAction,
    TextExtractor,
};
pub use worker_pool::WorkerPool;
pub use worker_pool_types::{lock_or_recover, PoolError, PoolStats, Task, WorkerPoolConfig};
