// uidpoll/src/error.rs

use thiserror::Error;

/// Common error type.
///
/// Every per-cycle variant is non-fatal: the poll loop records it and
/// retries on the next cycle. Only [`Error::SubsystemInit`] and
/// [`Error::WorkerPanicked`] end the loop's usefulness.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no reader present")]
    NoReaderPresent,

    #[error("reader listing failed: {0}")]
    EnumerationFailure(String),

    #[error("reader {reader} unavailable: {reason}")]
    ReaderUnavailable { reader: String, reason: String },

    #[error("connect to {reader} failed: {reason}")]
    ConnectFailure { reader: String, reason: String },

    #[error("no card present")]
    NoCardPresent,

    #[error("transmit failed: {0}")]
    TransmitFailure(String),

    #[error("unexpected status: sw=({sw1:#04x}, {sw2:#04x}), {len} data bytes")]
    UnexpectedStatus { sw1: u8, sw2: u8, len: usize },

    #[error("reader subsystem initialisation failed: {0}")]
    SubsystemInit(String),

    #[cfg(feature = "pcsc")]
    #[error("pcsc error: {0}")]
    Pcsc(#[from] pcsc::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid uid: {0}")]
    InvalidUid(String),

    #[error("uid channel closed")]
    ChannelClosed,

    #[error("poll worker panicked: {0}")]
    WorkerPanicked(String),
}

impl Error {
    /// True for conditions that a later poll cycle cannot recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::SubsystemInit(_) | Error::WorkerPanicked(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
