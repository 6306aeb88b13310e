// uidpoll/src/lib.rs

//! uidpoll
//!
//! Background PC/SC poller that reads a contactless card's UID with the
//! `FF CA 00 00 00` APDU and reports it in the five-byte MFRC522 layout
//! (`0x88`, three UID bytes, block check character) as a decimal number.
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod handoff;
pub mod poller;
pub mod prelude;
pub mod protocol;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
