// uidpoll/src/transport/pcsc.rs

use std::ffi::CString;
use std::fmt;

use pcsc::{Card, Context, Disposition, Protocols, Scope, ShareMode};

use crate::transport::traits::{ReaderSubsystem, Session};
use crate::types::ReaderHandle;
use crate::{Error, Result};

/// Reader subsystem backed by the host PC/SC service (pcsclite on
/// Linux/macOS, WinSCard on Windows).
pub struct PcscSubsystem {
    context: Context,
    share_mode: ShareMode,
    protocols: Protocols,
    /// Set when the service dropped our context; the next enumeration
    /// establishes a fresh one.
    stale_context: bool,
}

impl fmt::Debug for PcscSubsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscSubsystem")
            .field("share_mode", &self.share_mode)
            .field("protocols", &self.protocols)
            .field("stale_context", &self.stale_context)
            .finish()
    }
}

impl PcscSubsystem {
    /// Connect to the PC/SC service. Failure here (service not running,
    /// driver missing) is the one fatal condition and is meant to be
    /// reported once at startup.
    pub fn establish() -> Result<Self> {
        let context = Context::establish(Scope::User)
            .map_err(|e| Error::SubsystemInit(e.to_string()))?;
        Ok(Self {
            context,
            share_mode: ShareMode::Shared,
            protocols: Protocols::ANY,
            stale_context: false,
        })
    }

    pub fn with_share_mode(mut self, share_mode: ShareMode) -> Self {
        self.share_mode = share_mode;
        self
    }

    pub fn with_protocols(mut self, protocols: Protocols) -> Self {
        self.protocols = protocols;
        self
    }

    fn reestablish(&mut self) -> Result<()> {
        let context = Context::establish(Scope::User)?;
        self.context = context;
        self.stale_context = false;
        log::debug!("pcsc context re-established");
        Ok(())
    }
}

impl ReaderSubsystem for PcscSubsystem {
    fn enumerate(&mut self) -> Result<Vec<ReaderHandle>> {
        if self.stale_context {
            self.reestablish()
                .map_err(|e| Error::EnumerationFailure(e.to_string()))?;
        }

        match self.context.list_readers_owned() {
            Ok(names) => Ok(names
                .iter()
                .map(|n| ReaderHandle::new(n.to_string_lossy().into_owned()))
                .collect()),
            Err(pcsc::Error::NoReadersAvailable) => Ok(Vec::new()),
            Err(e) => {
                note_lost_context(&mut self.stale_context, e);
                Err(Error::EnumerationFailure(e.to_string()))
            }
        }
    }

    fn connect(&mut self, reader: &ReaderHandle) -> Result<Box<dyn Session>> {
        let name = CString::new(reader.name()).map_err(|_| Error::ReaderUnavailable {
            reader: reader.to_string(),
            reason: "reader name contains NUL".to_string(),
        })?;

        let card = self
            .context
            .connect(&name, self.share_mode, self.protocols)
            .map_err(|e| {
                note_lost_context(&mut self.stale_context, e);
                connect_error(reader, e)
            })?;

        Ok(Box::new(PcscSession {
            reader: reader.clone(),
            card: Some(card),
        }))
    }
}

/// Session over a connected PC/SC card handle.
pub struct PcscSession {
    reader: ReaderHandle,
    card: Option<Card>,
}

impl fmt::Debug for PcscSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscSession")
            .field("reader", &self.reader)
            .field("connected", &self.card.is_some())
            .finish()
    }
}

impl Session for PcscSession {
    fn reader(&self) -> &ReaderHandle {
        &self.reader
    }

    fn transmit(&mut self, command: &[u8]) -> Result<Vec<u8>> {
        let card = self.card.as_ref().ok_or(Error::NoCardPresent)?;
        let mut buf = [0u8; pcsc::MAX_BUFFER_SIZE];
        let reply = card.transmit(command, &mut buf).map_err(transmit_error)?;
        Ok(reply.to_vec())
    }
}

impl Drop for PcscSession {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            if let Err((_, e)) = card.disconnect(Disposition::LeaveCard) {
                log::debug!("disconnect from {} failed: {}", self.reader, e);
            }
        }
    }
}

fn context_lost(e: pcsc::Error) -> bool {
    matches!(
        e,
        pcsc::Error::NoService | pcsc::Error::ServiceStopped | pcsc::Error::InvalidHandle
    )
}

/// Flag the context for re-establishment when the service dropped it.
fn note_lost_context(stale: &mut bool, e: pcsc::Error) {
    if context_lost(e) {
        *stale = true;
    }
}

/// Map a connect failure onto the poll loop's taxonomy.
pub(crate) fn connect_error(reader: &ReaderHandle, e: pcsc::Error) -> Error {
    match e {
        pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard | pcsc::Error::UnpoweredCard => {
            Error::NoCardPresent
        }
        pcsc::Error::UnknownReader
        | pcsc::Error::ReaderUnavailable
        | pcsc::Error::SharingViolation
        | pcsc::Error::InvalidHandle => Error::ReaderUnavailable {
            reader: reader.to_string(),
            reason: e.to_string(),
        },
        other => Error::ConnectFailure {
            reader: reader.to_string(),
            reason: other.to_string(),
        },
    }
}

pub(crate) fn transmit_error(e: pcsc::Error) -> Error {
    match e {
        pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard => Error::NoCardPresent,
        other => Error::TransmitFailure(other.to_string()),
    }
}
