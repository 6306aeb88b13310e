// uidpoll/src/types.rs

use std::fmt;
use std::str::FromStr;

use derive_more::{Display, From};

use crate::Error;
use crate::constants::{MFRC522_PREFIX, SYNTHESIZED_UID_LEN, SYNTHESIZED_UID_MAX};

/// Name of an attached reader as reported by the reader subsystem.
///
/// Only meaningful while the subsystem still lists the reader; a handle
/// kept across cycles may go stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReaderHandle(String);

impl ReaderHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReaderHandle {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// MFRC522-style identifier: `[0x88, b0, b1, b2, bcc]`.
///
/// Displayed as the big-endian value of the five bytes in decimal, which
/// is the text format downstream consumers key users by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SynthesizedUid([u8; SYNTHESIZED_UID_LEN]);

impl SynthesizedUid {
    /// Wrap already-synthesized bytes. Use [`crate::protocol::synthesize`]
    /// to build one from a card response.
    pub(crate) fn from_bytes(bytes: [u8; SYNTHESIZED_UID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SYNTHESIZED_UID_LEN] {
        &self.0
    }

    /// The three card UID bytes this identifier was built from.
    pub fn card_bytes(&self) -> [u8; 3] {
        [self.0[1], self.0[2], self.0[3]]
    }

    /// Big-endian integer value of the five bytes.
    pub fn value(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl fmt::Display for SynthesizedUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for SynthesizedUid {
    type Err = Error;

    /// Parse the decimal form back into an identifier, checking that it
    /// carries the MFRC522 prefix and a valid BCC.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidUid(format!("not a decimal number: {:?}", s)));
        }
        let value: u64 = s
            .parse()
            .map_err(|e| Error::InvalidUid(format!("{}: {}", s, e)))?;
        if value > SYNTHESIZED_UID_MAX {
            return Err(Error::InvalidUid(format!("{} exceeds 5 bytes", value)));
        }

        let mut bytes = [0u8; SYNTHESIZED_UID_LEN];
        bytes.copy_from_slice(&value.to_be_bytes()[8 - SYNTHESIZED_UID_LEN..]);

        if bytes[0] != MFRC522_PREFIX {
            return Err(Error::InvalidUid(format!(
                "prefix {:#04x}, expected {:#04x}",
                bytes[0], MFRC522_PREFIX
            )));
        }
        let expected = crate::protocol::bcc(&bytes[..4]);
        if bytes[4] != expected {
            return Err(Error::InvalidUid(format!(
                "bcc {:#04x}, expected {:#04x}",
                bytes[4], expected
            )));
        }

        Ok(Self(bytes))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SynthesizedUid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SynthesizedUid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
