//! Types for the bounded worker pool.

use std::sync::Mutex;

/// Acquire a mutex lock, recovering from poison if a thread panicked.
#[inline]
pub fn lock_or_recover<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("Mutex was poisoned, recovering to maintain availability");
        poisoned.into_inner()
    })
}

#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// 0 means one worker per CPU.
    pub num_workers: usize,
    /// Pending tasks beyond this are rejected by `submit` and block
    /// `submit_wait`.
    pub queue_size: usize,
    pub thread_name_prefix: String,
    pub idle_timeout_ms: u64,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            num_workers: 0,
            queue_size: 256,
            thread_name_prefix: "pii-worker".to_string(),
            idle_timeout_ms: 50,
        }
    }
}

impl WorkerPoolConfig {
    pub fn from_batch(batch: &crate::config::BatchConfig) -> Self {
        Self { num_workers: batch.effective_workers(), queue_size: batch.queue_size, ..Self::default() }
    }
}

/// A unit of work for the pool.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub tasks_executed: u64,
    pub tasks_panicked: u64,
    pub queue_depth: usize,
    pub workers_busy: usize,
    pub workers: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Worker pool is shut down")]
    PoolShutdown,
    #[error("Task queue is full")]
    QueueFull,
    #[error("Failed to spawn worker: {0}")]
    ThreadSpawnFailed(String),
}
