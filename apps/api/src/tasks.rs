//! Long-running task slots: one busy gate, one progress channel and one
//! cancellation token per user-facing operation (upload, scoring, AI search).
//!
//! A slot admits a single task at a time. The `TaskHandle` returned by
//! `try_begin` releases the gate when dropped, so every exit path
//! (success, error, cancellation, panic unwinding) clears the busy flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum TaskError {
    #[error("{0} is already running")]
    Busy(&'static str),
}

/// A task stopped because its slot was cancelled.
#[derive(Debug, Error, PartialEq)]
#[error("{0} was cancelled")]
pub struct Cancelled(pub &'static str);

struct SlotInner {
    name: &'static str,
    busy: AtomicBool,
    progress: watch::Sender<u8>,
    cancel: Mutex<CancellationToken>,
}

#[derive(Clone)]
pub struct TaskSlot {
    inner: Arc<SlotInner>,
}

impl TaskSlot {
    pub fn new(name: &'static str) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            inner: Arc::new(SlotInner {
                name,
                busy: AtomicBool::new(false),
                progress,
                cancel: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    /// Claims the slot, or fails with `TaskError::Busy` while another task holds it.
    ///
    /// The token is installed under the cancel lock before `busy` is raised,
    /// so `cancel` never sees a busy slot paired with a previous task's token.
    pub fn try_begin(&self) -> Result<TaskHandle, TaskError> {
        let mut current = self.inner.cancel.lock();
        if self.inner.busy.load(Ordering::Acquire) {
            return Err(TaskError::Busy(self.inner.name));
        }

        let token = CancellationToken::new();
        *current = token.clone();
        self.inner.progress.send_replace(0);
        self.inner.busy.store(true, Ordering::Release);
        drop(current);

        let id = Uuid::new_v4();
        debug!(task = self.inner.name, %id, "task started");
        Ok(TaskHandle {
            inner: Arc::clone(&self.inner),
            token,
            id,
        })
    }

    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    /// Last reported progress, 0–100.
    pub fn progress(&self) -> u8 {
        *self.inner.progress.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.inner.progress.subscribe()
    }

    /// Cancels the running task, if any. Returns whether one was running.
    pub fn cancel(&self) -> bool {
        self.cancel_with(|| ()).0
    }

    /// Cancels the running task, if any, then runs `f` while still holding
    /// the cancel lock. A `TaskHandle::commit` racing with this call either
    /// lands before `f` or not at all.
    pub fn cancel_with<T>(&self, f: impl FnOnce() -> T) -> (bool, T) {
        let token = self.inner.cancel.lock();
        let was_running = self.inner.busy.load(Ordering::Acquire);
        if was_running {
            token.cancel();
        }
        (was_running, f())
    }
}

/// Exclusive claim on a `TaskSlot`. Dropping it frees the slot.
pub struct TaskHandle {
    inner: Arc<SlotInner>,
    token: CancellationToken,
    id: Uuid,
}

impl TaskHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn report(&self, pct: u8) {
        self.inner.progress.send_replace(pct.min(100));
    }

    /// Resolves once the slot is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Runs `f` unless this task has been cancelled. Serialized against
    /// `TaskSlot::cancel_with`.
    pub fn commit<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        let _guard = self.inner.cancel.lock();
        if self.token.is_cancelled() {
            None
        } else {
            Some(f())
        }
    }

    /// Waits out `total`, raising progress by `step` every `tick` (capped at 100).
    /// Resolves early with `Cancelled` when the slot is cancelled.
    pub async fn simulate(&self, total: Duration, tick: Duration, step: u8) -> Result<(), Cancelled> {
        let deadline = tokio::time::Instant::now() + total;
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + tick, tick);
        let mut pct: u8 = 0;

        loop {
            tokio::select! {
                _ = self.token.cancelled() => {
                    return Err(Cancelled(self.inner.name));
                }
                _ = tokio::time::sleep_until(deadline) => {
                    self.report(100);
                    return Ok(());
                }
                _ = ticker.tick(), if pct < 100 => {
                    pct = pct.saturating_add(step).min(100);
                    self.report(pct);
                }
            }
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        let _guard = self.inner.cancel.lock();
        self.inner.progress.send_replace(0);
        self.inner.busy.store(false, Ordering::Release);
        debug!(task = self.inner.name, id = %self.id, "task finished");
    }
}

/// Busy flags of every slot, as shown next to the controls.
#[derive(Clone)]
pub struct TaskSlots {
    pub upload: TaskSlot,
    pub scoring: TaskSlot,
    pub ai_search: TaskSlot,
}

impl Default for TaskSlots {
    fn default() -> Self {
        Self {
            upload: TaskSlot::new("upload"),
            scoring: TaskSlot::new("scoring"),
            ai_search: TaskSlot::new("ai search"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_rejected_while_busy() {
        let slot = TaskSlot::new("upload");
        let handle = slot.try_begin().unwrap();
        assert!(slot.is_busy());
        assert_eq!(slot.try_begin().err(), Some(TaskError::Busy("upload")));
        drop(handle);
        assert!(!slot.is_busy());
        assert!(slot.try_begin().is_ok());
    }

    #[test]
    fn test_cancel_without_task_is_noop() {
        let slot = TaskSlot::new("upload");
        assert!(!slot.cancel());
    }

    #[test]
    fn test_progress_resets_when_handle_drops() {
        let slot = TaskSlot::new("upload");
        let handle = slot.try_begin().unwrap();
        handle.report(40);
        assert_eq!(slot.progress(), 40);
        drop(handle);
        assert_eq!(slot.progress(), 0);
    }

    #[test]
    fn test_cancel_only_reaches_the_running_task() {
        let slot = TaskSlot::new("ai search");
        let first = slot.try_begin().unwrap();
        drop(first);

        let second = slot.try_begin().unwrap();
        assert_eq!(second.commit(|| 1), Some(1));
        assert!(slot.cancel());
        assert_eq!(second.commit(|| 2), None);
        drop(second);

        let third = slot.try_begin().unwrap();
        assert_eq!(third.commit(|| 3), Some(3));
    }

    #[test]
    fn test_cancel_with_runs_after_cancelling() {
        let slot = TaskSlot::new("ai search");
        assert_eq!(slot.cancel_with(|| "cleared"), (false, "cleared"));

        let handle = slot.try_begin().unwrap();
        assert_eq!(slot.cancel_with(|| "cleared"), (true, "cleared"));
        assert_eq!(handle.commit(|| "stale"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_reports_progress_and_completes() {
        let slot = TaskSlot::new("upload");
        let handle = slot.try_begin().unwrap();
        let mut rx = slot.subscribe();

        let run = tokio::spawn(async move {
            let result = handle
                .simulate(Duration::from_millis(2000), Duration::from_millis(150), 10)
                .await;
            (result, handle)
        });

        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let pct = *rx.borrow();
            seen.push(pct);
            if pct == 100 {
                break;
            }
        }

        let (result, handle) = run.await.unwrap();
        assert_eq!(result, Ok(()));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&100));
        drop(handle);
        assert!(!slot.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_stops_on_cancel() {
        let slot = TaskSlot::new("upload");
        let handle = slot.try_begin().unwrap();

        let run = tokio::spawn(async move {
            handle
                .simulate(Duration::from_secs(10), Duration::from_millis(150), 10)
                .await
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(slot.cancel());
        assert_eq!(run.await.unwrap(), Err(Cancelled("upload")));
        assert!(!slot.is_busy());
    }
}
