//! Tests for the bounded worker pool.

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::time::Duration;

fn config(workers: usize, queue_size: usize) -> WorkerPoolConfig {
    WorkerPoolConfig { num_workers: workers, queue_size, ..Default::default() }
}

#[test]
fn test_runs_all_tasks() {
    let pool = WorkerPool::new(config(4, 64)).unwrap();
    assert_eq!(pool.num_workers(), 4);

    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..50 {
        let counter = counter.clone();
        pool.submit_wait(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
    }
    pool.join();
    assert_eq!(counter.load(Ordering::SeqCst), 50);
}

#[test]
fn test_default_worker_count_uses_cpus() {
    let pool = WorkerPool::new(config(0, 8)).unwrap();
    assert_eq!(pool.num_workers(), num_cpus::get().max(1));
}

#[test]
fn test_queue_full_rejected() {
    let pool = WorkerPool::new(config(1, 1)).unwrap();
    let gate = Arc::new(Barrier::new(2));
    let (started_tx, started_rx) = mpsc::channel();

    let worker_gate = gate.clone();
    pool.submit(Box::new(move || {
        started_tx.send(()).unwrap();
        worker_gate.wait();
    }))
    .unwrap();
    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

    pool.submit(Box::new(|| {})).unwrap();
    assert!(matches!(pool.submit(Box::new(|| {})), Err(PoolError::QueueFull)));
    gate.wait();
}

#[test]
fn test_submit_after_shutdown() {
    let pool = WorkerPool::new(config(1, 4)).unwrap();
    pool.signal_shutdown();
    assert!(pool.is_shutdown());
    assert!(matches!(pool.submit(Box::new(|| {})), Err(PoolError::PoolShutdown)));
    assert!(matches!(pool.submit_wait(Box::new(|| {})), Err(PoolError::PoolShutdown)));
}

#[test]
fn test_panicking_task_does_not_kill_worker() {
    let pool = WorkerPool::new(config(1, 8)).unwrap();
    let (tx, rx) = mpsc::channel();
    pool.submit(Box::new(|| panic!("boom"))).unwrap();
    pool.submit(Box::new(move || tx.send(42).unwrap())).unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    let stats = pool.stats();
    assert_eq!(stats.tasks_panicked, 1);
    assert_eq!(stats.workers, 1);
}

#[test]
fn test_queued_tasks_drain_on_join() {
    let pool = WorkerPool::new(config(2, 128)).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..100 {
        let counter = counter.clone();
        pool.submit(Box::new(move || {
            std::thread::sleep(Duration::from_micros(50));
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
    }
    pool.signal_shutdown();
    pool.join();
    assert_eq!(counter.load(Ordering::SeqCst), 100);
}

#[test]
fn test_from_batch_config() {
    let batch = crate::config::BatchConfig { workers: 3, queue_size: 9, output_dir: None };
    let c = WorkerPoolConfig::from_batch(&batch);
    assert_eq!((c.num_workers, c.queue_size), (3, 9));
}
