//! Single-slot debounce timer.
//!
//! At most one delayed task is pending at a time. Scheduling a new task
//! aborts the previous one, so only the last call in a burst ever fires.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Identifies one scheduled task.
///
/// A fired task reports its token back to the owner, which checks it with
/// [`Debouncer::take_fired`] so an expiry that was already queued when a newer
/// task was scheduled can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceToken(u64);

struct Pending {
    token: DebounceToken,
    handle: JoinHandle<()>,
}

/// Cancelable delayed-task scheduler with a single slot.
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<Pending>,
}

impl Debouncer {
    /// Create a new debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// Schedule `fire` to run one quiet period from now, replacing any pending task.
    ///
    /// The deadline is fixed at call time, not when the task is first polled.
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, fire: F) -> DebounceToken
    where
        F: FnOnce(DebounceToken) + Send + 'static,
    {
        self.cancel();

        self.generation += 1;
        let token = DebounceToken(self.generation);
        let delay = self.delay;
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            fire(token);
        });

        tracing::trace!(?token, ?delay, "debounce scheduled");
        self.pending = Some(Pending { token, handle });
        token
    }

    /// Cancel the pending task, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.handle.abort();
                tracing::trace!(token = ?pending.token, "debounce cancelled");
                true
            }
            None => false,
        }
    }

    /// Check whether a task is scheduled and has not been taken yet.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Accept a fired token.
    ///
    /// Returns true and clears the slot only if `token` belongs to the task
    /// currently scheduled; tokens of replaced or cancelled tasks return false.
    pub fn take_fired(&mut self, token: DebounceToken) -> bool {
        match &self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.pending.as_ref().map(|p| p.token))
            .finish()
    }
}
