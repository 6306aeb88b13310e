// uidpoll/src/protocol/mod.rs

pub mod apdu;
pub mod bcc;
pub mod synth;

pub use apdu::{Response, transceive};
pub use bcc::bcc;
pub use synth::synthesize;
