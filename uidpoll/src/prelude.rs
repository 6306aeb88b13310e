// uidpoll/src/prelude.rs

pub use crate::handoff::{UidPublisher, UidReceiver, UidSink, uid_channel};
pub use crate::poller::{
    CancellationToken, PollConfig, PollStats, Poller, PollerHandle, RestartPolicy, spawn,
};
pub use crate::protocol::Response;
pub use crate::transport::{ReaderSubsystem, Session};
pub use crate::{Error, ReaderHandle, Result, SynthesizedUid};

#[cfg(feature = "pcsc")]
pub use crate::poller::spawn_pcsc;
#[cfg(feature = "pcsc")]
pub use crate::transport::PcscSubsystem;

pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, parse_hex};
