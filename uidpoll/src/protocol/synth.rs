// uidpoll/src/protocol/synth.rs

use crate::constants::{MFRC522_PREFIX, SYNTHESIZED_UID_LEN, UID_SOURCE_LEN};
use crate::protocol::apdu::Response;
use crate::protocol::bcc::bcc;
use crate::types::SynthesizedUid;
use crate::{Error, Result};

/// Build the MFRC522-style identifier from a GET UID response.
///
/// The reader must report SW1 = 0x90 and at least three payload bytes;
/// bytes past the third are ignored. Layout of the result:
/// `[0x88] [b0] [b1] [b2] [0x88 ^ b0 ^ b1 ^ b2]`
pub fn synthesize(response: &Response) -> Result<SynthesizedUid> {
    if !response.is_success() || response.data.len() < UID_SOURCE_LEN {
        return Err(Error::UnexpectedStatus {
            sw1: response.sw1,
            sw2: response.sw2,
            len: response.data.len(),
        });
    }

    let mut bytes = [0u8; SYNTHESIZED_UID_LEN];
    bytes[0] = MFRC522_PREFIX;
    bytes[1..4].copy_from_slice(&response.data[..UID_SOURCE_LEN]);
    bytes[4] = bcc(&bytes[..4]);
    Ok(SynthesizedUid::from_bytes(bytes))
}
