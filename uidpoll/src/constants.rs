// uidpoll/src/constants.rs
//! Protocol constants shared across the crate

/// ISO 7816-4 GET DATA, UID variant: CLA=FF INS=CA P1=00 P2=00 Le=00
pub const GET_UID_COMMAND: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];

/// Length of the status word trailer on every response APDU
pub const STATUS_WORD_LEN: usize = 2;

/// SW1 value reported on a successful exchange. SW2 is not inspected.
pub const SW1_SUCCESS: u8 = 0x90;

/// Cascade tag the MFRC522 reports as the first UID byte
pub const MFRC522_PREFIX: u8 = 0x88;

/// Number of card UID bytes folded into the synthesized identifier
pub const UID_SOURCE_LEN: usize = 3;

/// Length of the synthesized identifier: prefix, 3 UID bytes, BCC
pub const SYNTHESIZED_UID_LEN: usize = 5;

/// Largest value a 5-byte identifier can take (2^40 - 1)
pub const SYNTHESIZED_UID_MAX: u64 = (1u64 << 40) - 1;
