// uidpoll/src/protocol/apdu.rs

use crate::constants::{STATUS_WORD_LEN, SW1_SUCCESS};
use crate::transport::Session;
use crate::{Error, Result};

/// Response APDU split into payload and status word.
/// Wire format: [Data(n)] [SW1(1)] [SW2(1)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub data: Vec<u8>,
    pub sw1: u8,
    pub sw2: u8,
}

impl Response {
    /// Split a raw reply into payload and trailer. A reply too short to
    /// hold the status word is treated as a failed exchange.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() < STATUS_WORD_LEN {
            return Err(Error::TransmitFailure(format!(
                "reply of {} bytes has no status word",
                raw.len()
            )));
        }
        let (data, sw) = raw.split_at(raw.len() - STATUS_WORD_LEN);
        Ok(Self {
            data: data.to_vec(),
            sw1: sw[0],
            sw2: sw[1],
        })
    }

    /// Only SW1 is inspected; readers disagree on SW2 for this command.
    pub fn is_success(&self) -> bool {
        self.sw1 == SW1_SUCCESS
    }

    pub fn status_word(&self) -> u16 {
        u16::from_be_bytes([self.sw1, self.sw2])
    }
}

/// Send `command` on an open session and parse the reply.
/// No retries: the poll loop's next cycle is the retry.
pub fn transceive(session: &mut dyn Session, command: &[u8]) -> Result<Response> {
    #[cfg(feature = "diagnostics")]
    log::trace!("apdu >> {}", crate::utils::bytes_to_hex_spaced(command));

    let raw = session.transmit(command)?;

    #[cfg(feature = "diagnostics")]
    log::trace!("apdu << {}", crate::utils::bytes_to_hex_spaced(&raw));

    Response::parse(&raw)
}
