//! Cancellable fixed-interval task.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A job that runs immediately and then again `interval` after each run
/// completes, until canceled.
///
/// Canceling never interrupts a run in progress; the loop exits once that
/// run finishes. Dropping the handle cancels as well.
#[derive(Debug)]
pub struct ScheduledTask {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Spawn `job` on the current runtime.
    pub fn spawn_repeating<F, Fut>(interval: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (cancel, mut cancelled) = watch::channel(false);

        let handle = tokio::spawn(async move {
            while !*cancelled.borrow_and_update() {
                job().await;

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    changed = cancelled.changed() => {
                        // Sender dropped or cancel sent
                        if changed.is_err() || *cancelled.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Self { cancel, handle }
    }

    /// Stop scheduling further runs.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Whether the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the loop to exit. Only returns after [`cancel`](Self::cancel).
    pub async fn join(self) {
        let Self { cancel, handle } = self;
        let _ = handle.await;
        drop(cancel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(interval: Duration, work: Duration) -> (ScheduledTask, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let task = ScheduledTask::spawn_repeating(interval, move || {
            let counter = Arc::clone(&counter);
            async move {
                tokio::time::sleep(work).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (task, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_on_interval() {
        let (task, runs) = counting_task(Duration::from_secs(300), Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 4);

        task.cancel();
        task.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_future_runs() {
        let (task, runs) = counting_task(Duration::from_secs(300), Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(10)).await;
        task.cancel();
        assert!(task.is_cancelled());

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
        task.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_run_completes_after_cancel() {
        let (task, runs) = counting_task(Duration::from_secs(300), Duration::from_secs(30));

        // Cancel while the first run is still working
        tokio::time::sleep(Duration::from_secs(5)).await;
        task.cancel();
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        task.join().await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (task, runs) = counting_task(Duration::from_secs(60), Duration::ZERO);
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(task);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
