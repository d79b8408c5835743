//! Deferred execution of post-action work.
//!
//! # Responsibilities
//! - Run a job after the current unit of work, never inline
//! - Keep jobs for one chain strictly sequential (the chain only defers one at a time)
//!
//! # Design Decisions
//! - `TokioScheduler` spawns onto a runtime handle, so each job runs on a later poll
//! - `QueueScheduler` is a FIFO drained by the caller, for synchronous embedders and tests

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tokio::runtime::Handle;

/// A unit of deferred work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errors raised while building a scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no tokio runtime is running on this thread")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Capability to run a job after the current unit of work.
pub trait Scheduler: Send + Sync {
    fn defer(&self, job: Job);
}

/// Defers jobs onto a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime driving the current thread.
    pub fn try_current() -> Result<Self, SchedulerError> {
        Ok(Self::new(Handle::try_current()?))
    }
}

impl Scheduler for TokioScheduler {
    fn defer(&self, job: Job) {
        self.handle.spawn(async move { job() });
    }
}

/// FIFO of deferred jobs, drained explicitly.
#[derive(Default)]
pub struct QueueScheduler {
    jobs: Mutex<VecDeque<Job>>,
}

impl QueueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Run the jobs queued at call time. Jobs they defer wait for the next call.
    ///
    /// Returns the number of jobs run.
    pub fn run_pending(&self) -> usize {
        let batch: Vec<Job> = self.lock().drain(..).collect();
        let count = batch.len();
        for job in batch {
            job();
        }
        count
    }

    /// Run jobs until the queue stays empty.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.run_pending();
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for QueueScheduler {
    fn defer(&self, job: Job) {
        self.lock().push_back(job);
    }
}

impl std::fmt::Debug for QueueScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_queue_defers_until_drained() {
        let scheduler = QueueScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        scheduler.defer(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_nested_jobs_wait_for_next_batch() {
        let scheduler = Arc::new(QueueScheduler::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let s = scheduler.clone();
        let c = counter.clone();
        scheduler.defer(Box::new(move || {
            let c2 = c.clone();
            s.defer(Box::new(move || {
                c2.fetch_add(10, Ordering::SeqCst);
            }));
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.run_until_idle(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_tokio_scheduler_requires_runtime() {
        assert!(TokioScheduler::try_current().is_err());
    }

    #[tokio::test]
    async fn test_tokio_scheduler_runs_job() {
        let scheduler = TokioScheduler::try_current().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        scheduler.defer(Box::new(move || {
            let _ = tx.send(42);
        }));

        assert_eq!(rx.await.unwrap(), 42);
    }
}
