// uidpoll/src/protocol/bcc.rs

/// Compute the Block Check Character over UID bytes.
/// BCC = XOR of every byte (0x00 for an empty slice)
pub fn bcc(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc ^ b)
}
