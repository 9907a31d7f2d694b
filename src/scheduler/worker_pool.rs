//! Bounded worker pool for per-file batch work.
//!
//! One shared FIFO queue guarded by a mutex, with a condvar for idle
//! workers and submitters waiting for space. A panicking task is caught
//! and counted; the worker keeps running.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub use super::worker_pool_types::*;

struct Shared {
    queue: Mutex<VecDeque<Task>>,
    /// Signalled when a task is queued or shutdown begins.
    work_ready: Condvar,
    /// Signalled when a task leaves the queue.
    space_ready: Condvar,
    shutdown: AtomicBool,
    busy: AtomicUsize,
    executed: AtomicU64,
    panicked: AtomicU64,
    queue_size: usize,
}

pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(config: WorkerPoolConfig) -> Result<Self, PoolError> {
        let num_workers = if config.num_workers == 0 { num_cpus::get().max(1) } else { config.num_workers };
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::with_capacity(config.queue_size)),
            work_ready: Condvar::new(),
            space_ready: Condvar::new(),
            shutdown: AtomicBool::new(false),
            busy: AtomicUsize::new(0),
            executed: AtomicU64::new(0),
            panicked: AtomicU64::new(0),
            queue_size: config.queue_size.max(1),
        });

        let idle_timeout = Duration::from_millis(config.idle_timeout_ms.max(1));
        let mut pool = Self { shared, workers: Vec::with_capacity(num_workers) };
        for id in 0..num_workers {
            let shared = pool.shared.clone();
            let handle = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name_prefix, id))
                .spawn(move || worker_loop(shared, idle_timeout))
                .map_err(|e| PoolError::ThreadSpawnFailed(e.to_string()))?;
            pool.workers.push(handle);
        }
        tracing::debug!(workers = num_workers, queue_size = config.queue_size, "Worker pool started");
        Ok(pool)
    }

    /// Queue `task`, failing fast when the queue is full.
    pub fn submit(&self, task: Task) -> Result<(), PoolError> {
        if self.is_shutdown() { return Err(PoolError::PoolShutdown); }
        {
            let mut q = lock_or_recover(&self.shared.queue);
            if q.len() >= self.shared.queue_size { return Err(PoolError::QueueFull); }
            q.push_back(task);
        }
        self.shared.work_ready.notify_one();
        Ok(())
    }

    /// Queue `task`, waiting for space when the queue is full.
    pub fn submit_wait(&self, task: Task) -> Result<(), PoolError> {
        let mut q = lock_or_recover(&self.shared.queue);
        loop {
            if self.is_shutdown() { return Err(PoolError::PoolShutdown); }
            if q.len() < self.shared.queue_size { break; }
            q = self.shared.space_ready.wait(q).unwrap_or_else(|p| p.into_inner());
        }
        q.push_back(task);
        drop(q);
        self.shared.work_ready.notify_one();
        Ok(())
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            tasks_executed: self.shared.executed.load(Ordering::SeqCst),
            tasks_panicked: self.shared.panicked.load(Ordering::SeqCst),
            queue_depth: lock_or_recover(&self.shared.queue).len(),
            workers_busy: self.shared.busy.load(Ordering::SeqCst),
            workers: self.workers.len(),
        }
    }

    pub fn num_workers(&self) -> usize { self.workers.len() }
    pub fn is_shutdown(&self) -> bool { self.shared.shutdown.load(Ordering::SeqCst) }

    /// Stop accepting work. Queued tasks still run before workers exit.
    pub fn signal_shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        let _g = lock_or_recover(&self.shared.queue);
        self.shared.work_ready.notify_all();
        self.shared.space_ready.notify_all();
    }

    /// Drain the queue and wait for every worker.
    pub fn join(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        self.signal_shutdown();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

fn worker_loop(shared: Arc<Shared>, idle_timeout: Duration) {
    loop {
        let task = {
            let mut q = lock_or_recover(&shared.queue);
            loop {
                if let Some(task) = q.pop_front() { break Some(task); }
                if shared.shutdown.load(Ordering::SeqCst) { break None; }
                q = match shared.work_ready.wait_timeout(q, idle_timeout) {
                    Ok((guard, _)) => guard,
                    Err(poisoned) => poisoned.into_inner().0,
                };
            }
        };
        let Some(task) = task else { return };
        shared.space_ready.notify_one();

        shared.busy.fetch_add(1, Ordering::SeqCst);
        if catch_unwind(AssertUnwindSafe(task)).is_err() {
            shared.panicked.fetch_add(1, Ordering::SeqCst);
            tracing::warn!("Worker task panicked; continuing");
        }
        shared.executed.fetch_add(1, Ordering::SeqCst);
        shared.busy.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "worker_pool_tests.rs"]
mod tests;
