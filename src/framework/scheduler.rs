//! # Timers
//!
//! Cancelable one-shot callbacks behind the [`Scheduler`] trait.
//!
//! Production code uses [`TokioScheduler`]. Tests use [`ManualScheduler`], a virtual clock
//! that only moves when [`ManualScheduler::advance`] is called, so expiry tests never sleep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::trace;

/// A callback fired once by a [`Scheduler`].
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled callback.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Prevent the callback from firing. Has no effect once it already fired.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Schedules cancelable one-shot callbacks.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;
}

/// Real-time scheduler backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::default();
        let cancelled = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !cancelled.is_cancelled() {
                callback();
            }
        });
        handle
    }
}

struct PendingTimer {
    deadline: Duration,
    seq: u64,
    handle: TimerHandle,
    callback: TimerCallback,
}

#[derive(Default)]
struct VirtualClock {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTimer>,
}

/// Virtual-clock scheduler for deterministic tests.
///
/// Callbacks fire synchronously inside [`ManualScheduler::advance`], in deadline order
/// (ties in scheduling order).
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<VirtualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of timers neither fired nor cancelled.
    pub fn pending(&self) -> usize {
        self.lock()
            .pending
            .iter()
            .filter(|t| !t.handle.is_cancelled())
            .count()
    }

    /// Move the clock forward and fire every callback that came due.
    pub fn advance(&self, by: Duration) {
        let due = {
            let mut clock = self.lock();
            clock.now += by;
            let now = clock.now;
            let (mut due, waiting): (Vec<_>, Vec<_>) =
                clock.pending.drain(..).partition(|t| t.deadline <= now);
            clock.pending = waiting;
            due.sort_by_key(|t| (t.deadline, t.seq));
            due
        };

        // Fire outside the lock so callbacks may schedule again.
        for timer in due {
            if timer.handle.is_cancelled() {
                trace!(seq = timer.seq, "Skipping cancelled timer");
                continue;
            }
            trace!(seq = timer.seq, "Firing timer");
            (timer.callback)();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VirtualClock> {
        // A panicking callback never runs under the lock, so poisoning is not expected.
        self.clock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::default();
        let mut clock = self.lock();
        let seq = clock.next_seq;
        clock.next_seq += 1;
        let deadline = clock.now + delay;
        clock.pending.push(PendingTimer {
            deadline,
            seq,
            handle: handle.clone(),
            callback,
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> TimerCallback) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let make = move |name: &'static str| -> TimerCallback {
            let sink = sink.clone();
            Box::new(move || sink.lock().unwrap().push(name))
        };
        (fired, make)
    }

    #[test]
    fn test_manual_scheduler_fires_in_deadline_order() {
        let scheduler = ManualScheduler::new();
        let (fired, make) = recorder();

        scheduler.schedule(Duration::from_millis(300), make("late"));
        scheduler.schedule(Duration::from_millis(100), make("early"));
        scheduler.schedule(Duration::from_millis(100), make("early-second"));

        scheduler.advance(Duration::from_millis(99));
        assert!(fired.lock().unwrap().is_empty());

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(*fired.lock().unwrap(), vec!["early", "early-second"]);

        scheduler.advance(Duration::from_millis(500));
        assert_eq!(*fired.lock().unwrap(), vec!["early", "early-second", "late"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let scheduler = ManualScheduler::new();
        let (fired, make) = recorder();

        let handle = scheduler.schedule(Duration::from_secs(1), make("cancelled"));
        handle.cancel();
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(Duration::from_secs(2));
        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_fires_after_delay() {
        let (fired, make) = recorder();
        TokioScheduler.schedule(Duration::from_millis(3000), make("toast"));

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert!(fired.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["toast"]);
    }
}
