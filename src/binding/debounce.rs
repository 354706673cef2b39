//! Trailing-edge debouncing for resize bursts.
//!
//! A window resize delivers dozens of events in quick succession; resolving
//! a thumbnail for each would hammer the service with URLs that are obsolete
//! milliseconds later. The debouncer collapses a burst into one trailing
//! invocation after a quiescence window.
//!
//! Each [`call`](Debouncer::call) arms a timer stamped with a sequence
//! number; a later call supersedes any pending timer by advancing the
//! sequence, and teardown disarms all timers through an active flag that the
//! timer re-checks before acting. This closes the race between an in-flight
//! timer and teardown.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

type DebounceCallback = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Collapses repeated calls within a window into one trailing call.
///
/// Thread-safe; dropping the debouncer disarms any pending timer.
pub struct Debouncer {
    /// Quiescence window.
    window: Duration,

    /// Sequence of the most recent call; only the timer holding the latest
    /// sequence fires.
    sequence: Arc<AtomicU64>,

    /// Cleared on cancel/drop; timers become inert.
    active: Arc<AtomicBool>,

    /// The debounced action.
    callback: DebounceCallback,
}

impl Debouncer {
    /// Create a debouncer invoking `callback` after `window` of quiet.
    pub fn new<C, Fut>(window: Duration, callback: C) -> Self
    where
        C: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            window,
            sequence: Arc::new(AtomicU64::new(0)),
            active: Arc::new(AtomicBool::new(true)),
            callback: Arc::new(move || {
                Box::pin(callback()) as Pin<Box<dyn Future<Output = ()> + Send>>
            }),
        }
    }

    /// Schedule (or reschedule) the trailing invocation.
    pub fn call(&self) {
        let scheduled = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let sequence = self.sequence.clone();
        let active = self.active.clone();
        let callback = self.callback.clone();
        let window = self.window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;

            // Superseded by a later call, or torn down while we slept.
            if !active.load(Ordering::SeqCst) || sequence.load(Ordering::SeqCst) != scheduled {
                return;
            }

            (callback)().await;
        });
    }

    /// Disarm all pending timers. Irreversible.
    pub fn cancel(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// Tests
// =============================================================================
