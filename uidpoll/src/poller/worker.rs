// uidpoll/src/poller/worker.rs

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crate::handoff::UidSink;
use crate::poller::{CancellationToken, PollStats, Poller, RestartPolicy};
use crate::transport::ReaderSubsystem;
use crate::{Error, Result};

/// Handle to a poll loop running on its own thread.
///
/// Dropping the handle cancels the loop without waiting for it; call
/// [`join`](Self::join) to wait and collect the stats.
#[derive(Debug)]
pub struct PollerHandle {
    cancel: CancellationToken,
    thread: Option<JoinHandle<Result<PollStats>>>,
}

impl PollerHandle {
    /// Ask the loop to stop. It finishes the cycle in flight first.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Wait for the loop to exit. Does not cancel it.
    pub fn join(mut self) -> Result<PollStats> {
        let thread = self.thread.take().ok_or(Error::ChannelClosed)?;
        thread
            .join()
            .map_err(|payload| Error::WorkerPanicked(panic_message(payload.as_ref())))?
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.cancel.cancel();
        }
    }
}

/// Start `poller` on a dedicated thread named after its config.
pub fn spawn<S, K>(poller: Poller<S, K>) -> Result<PollerHandle>
where
    S: ReaderSubsystem + Send + 'static,
    K: UidSink + Send + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let name = poller.config().thread_name.clone();

    let thread = thread::Builder::new()
        .name(name)
        .spawn(move || supervise(poller, &token))?;

    Ok(PollerHandle {
        cancel,
        thread: Some(thread),
    })
}

/// Connect to PC/SC and start polling its first reader, publishing into
/// `sink`. A PC/SC initialisation failure is returned here, once, rather
/// than retried by the loop.
#[cfg(feature = "pcsc")]
pub fn spawn_pcsc<K>(config: crate::poller::PollConfig, sink: K) -> Result<PollerHandle>
where
    K: UidSink + Send + 'static,
{
    let subsystem = crate::transport::PcscSubsystem::establish()?;
    spawn(Poller::new(subsystem, sink).with_config(config))
}

/// Run the loop, restarting it after a panic while the policy allows.
fn supervise<S, K>(mut poller: Poller<S, K>, cancel: &CancellationToken) -> Result<PollStats>
where
    S: ReaderSubsystem,
    K: UidSink,
{
    let mut restarts = 0u32;
    loop {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| poller.run(cancel)));
        let payload = match outcome {
            Ok(stats) => return Ok(stats),
            Err(payload) => payload,
        };

        let msg = panic_message(payload.as_ref());
        log::error!("poll loop panicked: {}", msg);

        match poller.config().restart_policy {
            RestartPolicy::Limited {
                max_restarts,
                backoff,
            } if restarts < max_restarts => {
                restarts += 1;
                poller.note_restart();
                log::warn!(
                    "restarting poll loop in {:?} ({}/{})",
                    backoff,
                    restarts,
                    max_restarts
                );
                if cancel.wait_timeout(backoff) {
                    return Ok(poller.stats().clone());
                }
            }
            _ => return Err(Error::WorkerPanicked(msg)),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
