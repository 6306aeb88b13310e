//! Small helpers shared across the crate: hex formatting for logs and
//! test scripts.

pub mod hex;

pub use hex::*;
