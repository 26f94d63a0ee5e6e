//! Cancellable fixed-interval polling.
//!
//! One task per view. Ticks never overlap (a slow fetch delays the next tick
//! and missed ticks are skipped), results are published last-write-wins to a
//! `watch` channel, and fetch errors are logged and skipped. Once the handle
//! is cancelled or dropped nothing more is published, including the result of
//! a fetch that was in flight.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shortest period a poll runs at; smaller periods, including zero, are raised
/// to it.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Disposable handle to a running poll.
#[derive(Debug)]
pub struct PollHandle<T> {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
    rx: watch::Receiver<Option<T>>,
}

impl<T> PollHandle<T> {
    /// Stop the poll. Safe to call repeatedly.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Receiver for callers that want to watch the value themselves.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.rx.clone()
    }

    /// Cancel and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl<T: Clone> PollHandle<T> {
    /// Most recently published value.
    pub fn latest(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next published value. `None` once the poll has stopped.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }
}

impl<T> Drop for PollHandle<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Start polling `fetch` every `period`, with its own cancellation token.
pub fn spawn<T, E, F, Fut>(name: &'static str, period: Duration, fetch: F) -> PollHandle<T>
where
    T: Send + Sync + 'static,
    E: Display + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    spawn_with(CancellationToken::new(), name, period, fetch)
}

/// Start polling under `token`; cancelling `token` (or any parent of it)
/// stops the poll.
pub fn spawn_with<T, E, F, Fut>(
    token: CancellationToken,
    name: &'static str,
    period: Duration,
    mut fetch: F,
) -> PollHandle<T>
where
    T: Send + Sync + 'static,
    E: Display + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let period = period.max(MIN_PERIOD);
    let (tx, rx) = watch::channel(None);
    let task_token = token.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!(poll = name, period_ms = period.as_millis() as u64, "poll started");

        loop {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = task_token.cancelled() => break,
                result = fetch() => result,
            };

            match result {
                Ok(value) => {
                    if task_token.is_cancelled() || tx.send(Some(value)).is_err() {
                        break;
                    }
                }
                Err(e) => debug!(poll = name, error = %e, "poll fetch failed"),
            }
        }

        debug!(poll = name, "poll stopped");
    });

    PollHandle {
        token,
        task: Some(task),
        rx,
    }
}
