#[path = "../common/mod.rs"]
mod common;

use common::fixtures::*;
use proptest::prelude::*;
use uidpoll::protocol::{Response, bcc, synthesize};
use uidpoll::{Error, SynthesizedUid};

fn synth(hex_reply: &str) -> uidpoll::Result<SynthesizedUid> {
    synthesize(&Response::parse(&reply(hex_reply))?)
}

#[test]
fn zero_uid_worked_example() {
    let uid = synth(ZERO_UID_REPLY).unwrap();
    assert_eq!(uid.as_bytes(), &ZERO_UID_BYTES);
    assert_eq!(uid.to_string(), ZERO_UID_DECIMAL);
}

#[test]
fn four_byte_uid_keeps_first_three() {
    let uid = synth(NXP_UID_REPLY).unwrap();
    assert_eq!(uid.as_bytes(), &NXP_UID_BYTES);
    assert_eq!(uid.value(), 0x88_04_a2_3b_15);
    assert_eq!(uid.to_hex(), "8804a23b15");
}

#[test]
fn error_status_is_rejected() {
    for r in [WRONG_PARAMS_REPLY, NOT_SUPPORTED_REPLY] {
        assert!(matches!(synth(r), Err(Error::UnexpectedStatus { len: 0, .. })));
    }
}

#[test]
fn success_with_short_payload_is_rejected() {
    assert!(matches!(
        synth("04 a2 90 00"),
        Err(Error::UnexpectedStatus {
            sw1: 0x90,
            len: 2,
            ..
        })
    ));
}

#[test]
fn sw2_is_not_checked() {
    assert!(synth("01 02 03 90 01").is_ok());
}

proptest! {
    #[test]
    fn prefix_and_check_byte_hold(card in proptest::collection::vec(any::<u8>(), 3..10)) {
        let mut raw = card.clone();
        raw.extend_from_slice(&[0x90, 0x00]);
        let uid = synthesize(&Response::parse(&raw).unwrap()).unwrap();
        let bytes = uid.as_bytes();
        prop_assert_eq!(bytes[0], 0x88);
        prop_assert_eq!(&bytes[1..4], &card[..3]);
        prop_assert_eq!(bcc(&bytes[..4]), bytes[4]);
        prop_assert_eq!(bcc(bytes), 0);
    }
}
