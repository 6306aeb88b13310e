// uidpoll/src/handoff.rs
//! Hand-off of synthesized UIDs from the poll thread to one consumer.
//!
//! The channel holds a single slot: publishing overwrites any value the
//! consumer has not taken yet, so a slow consumer always sees the most
//! recently scanned card and never a backlog.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::types::SynthesizedUid;
use crate::{Error, Result};

/// Destination for UIDs produced by the poll loop.
pub trait UidSink {
    /// Deliver one UID. Must not block for long; it runs on the poll thread.
    fn publish(&mut self, uid: SynthesizedUid);
}

// Closures can act as sinks, e.g. to post onto a UI event loop.
impl<F> UidSink for F
where
    F: FnMut(SynthesizedUid),
{
    fn publish(&mut self, uid: SynthesizedUid) {
        self(uid)
    }
}

#[derive(Debug, Default)]
struct Slot {
    value: Option<SynthesizedUid>,
    published: u64,
    overwritten: u64,
    publisher_gone: bool,
    receiver_gone: bool,
}

#[derive(Debug, Default)]
struct Shared {
    slot: Mutex<Slot>,
    ready: Condvar,
    #[cfg(feature = "async")]
    notify: tokio::sync::Notify,
}

/// Create a single-slot, last-write-wins channel.
pub fn uid_channel() -> (UidPublisher, UidReceiver) {
    let shared = Arc::new(Shared::default());
    (
        UidPublisher {
            shared: Arc::clone(&shared),
        },
        UidReceiver { shared },
    )
}

/// Producer half, owned by the poll loop.
#[derive(Debug)]
pub struct UidPublisher {
    shared: Arc<Shared>,
}

impl UidPublisher {
    /// Whether the consumer half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.shared.slot.lock().receiver_gone
    }
}

impl UidSink for UidPublisher {
    fn publish(&mut self, uid: SynthesizedUid) {
        {
            let mut slot = self.shared.slot.lock();
            if slot.receiver_gone {
                log::trace!("uid {} dropped: receiver gone", uid);
                return;
            }
            if slot.value.replace(uid).is_some() {
                slot.overwritten += 1;
            }
            slot.published += 1;
        }
        self.shared.ready.notify_one();
        #[cfg(feature = "async")]
        self.shared.notify.notify_one();
    }
}

impl Drop for UidPublisher {
    fn drop(&mut self) {
        self.shared.slot.lock().publisher_gone = true;
        self.shared.ready.notify_all();
        #[cfg(feature = "async")]
        self.shared.notify.notify_one();
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct UidReceiver {
    shared: Arc<Shared>,
}

impl UidReceiver {
    /// Take the pending UID, if any, without blocking.
    pub fn try_recv(&self) -> Option<SynthesizedUid> {
        self.shared.slot.lock().value.take()
    }

    /// Block until a UID is available. Fails with `ChannelClosed` once
    /// the publisher is gone and the slot is empty.
    pub fn recv(&self) -> Result<SynthesizedUid> {
        let mut slot = self.shared.slot.lock();
        loop {
            if let Some(uid) = slot.value.take() {
                return Ok(uid);
            }
            if slot.publisher_gone {
                return Err(Error::ChannelClosed);
            }
            self.shared.ready.wait(&mut slot);
        }
    }

    /// Like [`recv`](Self::recv) but gives up after `timeout`, returning
    /// `Ok(None)`.
    /// A timeout too large to express as a deadline behaves like `recv`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<SynthesizedUid>> {
        let deadline = Instant::now().checked_add(timeout);
        let mut slot = self.shared.slot.lock();
        loop {
            if let Some(uid) = slot.value.take() {
                return Ok(Some(uid));
            }
            if slot.publisher_gone {
                return Err(Error::ChannelClosed);
            }
            match deadline {
                Some(deadline) => {
                    if self
                        .shared
                        .ready
                        .wait_until(&mut slot, deadline)
                        .timed_out()
                    {
                        return Ok(slot.value.take());
                    }
                }
                None => self.shared.ready.wait(&mut slot),
            }
        }
    }

    /// Await the next UID from async code.
    #[cfg(feature = "async")]
    pub async fn recv_async(&self) -> Result<SynthesizedUid> {
        loop {
            {
                let mut slot = self.shared.slot.lock();
                if let Some(uid) = slot.value.take() {
                    return Ok(uid);
                }
                if slot.publisher_gone {
                    return Err(Error::ChannelClosed);
                }
            }
            // notify_one stores a permit, so a publish that lands between
            // the check above and this await is not lost.
            self.shared.notify.notified().await;
        }
    }

    /// Number of UIDs published so far.
    pub fn published(&self) -> u64 {
        self.shared.slot.lock().published
    }

    /// Number of UIDs replaced before the consumer took them.
    pub fn overwritten(&self) -> u64 {
        self.shared.slot.lock().overwritten
    }

    pub fn is_closed(&self) -> bool {
        self.shared.slot.lock().publisher_gone
    }
}

impl Drop for UidReceiver {
    fn drop(&mut self) {
        self.shared.slot.lock().receiver_gone = true;
    }
}
