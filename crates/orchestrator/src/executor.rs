//! Task submission.
//!
//! Controllers never run their work on the caller's thread; they hand one
//! task to a [`TaskSubmitter`] and return.

use std::sync::Mutex;
use tokio::runtime::Handle;
use tracing::debug;

/// A unit of work handed to a submitter.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait TaskSubmitter: Send + Sync {
    fn submit(&self, task: Task);
}

/// Runs each task immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSubmitter;

impl TaskSubmitter for InlineSubmitter {
    fn submit(&self, task: Task) {
        task();
    }
}

/// Runs tasks on the tokio blocking pool.
///
/// Steps block on bus traffic, so tasks go to `spawn_blocking` rather than
/// the async workers.
#[derive(Debug, Clone)]
pub struct TokioSubmitter {
    handle: Handle,
}

impl TokioSubmitter {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Submitter bound to the runtime of the calling context, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl TaskSubmitter for TokioSubmitter {
    fn submit(&self, task: Task) {
        debug!("Submitting task to blocking pool");
        drop(self.handle.spawn_blocking(task));
    }
}

/// Holds tasks until the owner runs them.
#[derive(Default)]
pub struct QueuedSubmitter {
    tasks: Mutex<Vec<Task>>,
}

impl QueuedSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Run every queued task in submission order; returns how many ran.
    pub fn run_pending(&self) -> usize {
        let tasks = std::mem::take(&mut *self.lock());
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TaskSubmitter for QueuedSubmitter {
    fn submit(&self, task: Task) {
        self.lock().push(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(counter: &Arc<AtomicUsize>) -> Task {
        let counter = counter.clone();
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_inline_runs_immediately() {
        let counter = Arc::new(AtomicUsize::new(0));
        InlineSubmitter.submit(counting_task(&counter));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_queued_defers_until_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        let submitter = QueuedSubmitter::new();
        submitter.submit(counting_task(&counter));
        submitter.submit(counting_task(&counter));

        assert_eq!(submitter.pending(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(submitter.run_pending(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(submitter.pending(), 0);
    }

    #[tokio::test]
    async fn test_tokio_submitter_runs_task() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let submitter = TokioSubmitter::current().expect("inside runtime");
        submitter.submit(Box::new(move || {
            let _ = tx.send(42);
        }));
        assert_eq!(rx.await.unwrap(), 42);
    }

    #[test]
    fn test_no_current_runtime() {
        assert!(TokioSubmitter::current().is_none());
    }
}
