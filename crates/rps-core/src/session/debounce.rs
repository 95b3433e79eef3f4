//! Cancellable delayed task used to debounce move submissions.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A single pending delayed task.
///
/// Arming again cancels whatever was pending. Each arm gets a fresh
/// generation number; a task that wakes up should check
/// [`DelayedTask::is_current`] under the owner's lock before acting, since
/// an abort only lands at the task's next await point.
#[derive(Debug, Default)]
pub struct DelayedTask {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl DelayedTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `make(generation)` after `delay`, replacing any pending task.
    /// Must be called from within a Tokio runtime.
    pub fn arm<F, Fut>(&mut self, delay: Duration, make: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let work = make(self.generation);
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work.await;
        }));
        self.generation
    }

    /// Abort the pending task, if any. Returns whether one was still running.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                was_running
            }
            None => false,
        }
    }

    /// Whether `generation` belongs to the most recent arm
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let hits = Arc::new(AtomicU32::new(0));
        let mut task = DelayedTask::new();

        let counter = hits.clone();
        task.arm(Duration::from_millis(500), move |_| async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_pending() {
        let last = Arc::new(AtomicU32::new(0));
        let mut task = DelayedTask::new();

        for value in 1..=3 {
            let last = last.clone();
            task.arm(Duration::from_millis(500), move |_| async move {
                last.store(value, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(last.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generations() {
        let mut task = DelayedTask::new();
        let first = task.arm(Duration::from_millis(10), |_| async {});
        let second = task.arm(Duration::from_millis(10), |_| async {});

        assert!(!task.is_current(first));
        assert!(task.is_current(second));

        assert!(task.cancel());
        assert!(task.is_current(second));
        assert!(!task.cancel());
    }
}
