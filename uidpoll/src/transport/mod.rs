// uidpoll/src/transport/mod.rs

pub mod mock;
#[cfg(feature = "pcsc")]
pub mod pcsc;
pub mod traits;

pub use mock::{MockReaderSubsystem, MockSession};
#[cfg(feature = "pcsc")]
pub use self::pcsc::{PcscSession, PcscSubsystem};
pub use traits::{ReaderSubsystem, Session};
