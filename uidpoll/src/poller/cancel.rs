// uidpoll/src/poller/cancel.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Shared shutdown flag for the poll loop. Clones observe the same flag.
///
/// Besides the flag check at the top of each cycle, the loop sleeps on
/// the token between cycles so `cancel` also cuts a pacing wait short.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        *self.inner.cancelled.lock() = true;
        self.inner.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Sleep for up to `timeout`, returning early with `true` if the
    /// token is cancelled. A timeout too large to express as a deadline waits
    /// for `cancel` alone.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut cancelled = self.inner.cancelled.lock();
        while !*cancelled {
            match deadline {
                Some(deadline) => {
                    if self.inner.wake.wait_until(&mut cancelled, deadline).timed_out() {
                        break;
                    }
                }
                None => self.inner.wake.wait(&mut cancelled),
            }
        }
        *cancelled
    }
}
