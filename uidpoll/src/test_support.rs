//! Test support helpers intended for use by unit and integration tests.
//!
//! These centralize the usual [`MockReaderSubsystem`] setup so tests in
//! the crate and under `tests/` script readers and replies the same way.
#![allow(dead_code)]

use crate::constants::SW1_SUCCESS;
use crate::transport::mock::MockReaderSubsystem;
use crate::utils::parse_hex;

/// Raw reply carrying `card` followed by `90 00`.
#[doc(hidden)]
pub fn success_reply(card: &[u8]) -> Vec<u8> {
    let mut raw = card.to_vec();
    raw.extend_from_slice(&[SW1_SUCCESS, 0x00]);
    raw
}

/// Raw reply with no data, only the status word.
#[doc(hidden)]
pub fn status_reply(sw1: u8, sw2: u8) -> Vec<u8> {
    vec![sw1, sw2]
}

/// A mock with one reader named `reader` and `replies` queued in order.
#[doc(hidden)]
pub fn mock_with_replies(reader: &str, replies: Vec<Vec<u8>>) -> MockReaderSubsystem {
    let mock = MockReaderSubsystem::with_readers(&[reader]);
    for raw in replies {
        mock.push_reply(raw);
    }
    mock
}

/// Same as [`mock_with_replies`] with replies written as hex, e.g.
/// `"04 a2 3b 90 00"`.
#[doc(hidden)]
pub fn mock_with_hex_replies(
    reader: &str,
    replies: &[&str],
) -> Result<MockReaderSubsystem, String> {
    let raw = replies
        .iter()
        .map(|r| parse_hex(r))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(mock_with_replies(reader, raw))
}
