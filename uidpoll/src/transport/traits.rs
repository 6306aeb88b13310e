// uidpoll/src/transport/traits.rs

use crate::Result;
use crate::types::ReaderHandle;

/// An open connection to one reader, valid for a single poll cycle.
///
/// Implementations release the underlying connection in `Drop`, so a
/// session that goes out of scope on any path (including `?` early
/// returns) never outlives its cycle.
pub trait Session {
    /// Reader this session is bound to
    fn reader(&self) -> &ReaderHandle;

    /// Send a command APDU and return the raw reply, status word included.
    fn transmit(&mut self, command: &[u8]) -> Result<Vec<u8>>;
}

/// Reader subsystem trait abstracts the host's reader-access layer away
/// from the poll loop.
pub trait ReaderSubsystem {
    /// List currently attached readers. An empty list is not an error.
    fn enumerate(&mut self) -> Result<Vec<ReaderHandle>>;

    /// Open a fresh session on `reader`.
    fn connect(&mut self, reader: &ReaderHandle) -> Result<Box<dyn Session>>;
}

impl<T: ReaderSubsystem + ?Sized> ReaderSubsystem for Box<T> {
    fn enumerate(&mut self) -> Result<Vec<ReaderHandle>> {
        (**self).enumerate()
    }

    fn connect(&mut self, reader: &ReaderHandle) -> Result<Box<dyn Session>> {
        (**self).connect(reader)
    }
}
