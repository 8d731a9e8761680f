use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};
use chrono::{DateTime, Utc};

/// Cooperative cancellation token shared between the scheduler loop and the
/// signal handler.
///
/// All waiting in the process goes through `sleep`, which returns early as
/// soon as the token is cancelled. Cancellation is one-way, a cancelled
/// token stays cancelled.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

struct Inner {
    cancelled: Mutex<bool>,
    signal: Condvar,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken {
            inner: Arc::new(Inner { cancelled: Mutex::new(false), signal: Condvar::new() }),
        }
    }

    /// Cancels the token and wakes up every sleeper
    pub fn cancel(&self) {
        let mut cancelled = self.inner.cancelled.lock().unwrap_or_else(|e| e.into_inner());
        *cancelled = true;
        self.inner.signal.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleeps for the given duration, or until the token is cancelled,
    /// whichever comes first. Returns true if the full duration elapsed.
    ///
    /// # Arguments
    ///
    /// * 'duration' - how long to sleep
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;

        let mut cancelled = self.inner.cancelled.lock().unwrap_or_else(|e| e.into_inner());
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            cancelled = self.inner.signal
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(|e| e.into_inner())
                .0;
        }

        false
    }

    /// Sleeps until the given point in time, or until the token is
    /// cancelled. Returns true if the point in time was reached.
    ///
    /// # Arguments
    ///
    /// * 'wait_until' - the point in time to sleep until
    pub fn sleep_until(&self, wait_until: DateTime<Utc>) -> bool {
        match (wait_until - Utc::now()).to_std() {
            Ok(duration) => self.sleep(duration),
            Err(_) => true,
        }
    }
}
