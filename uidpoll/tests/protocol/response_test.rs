#[path = "../common/mod.rs"]
mod common;

use common::fixtures::*;
use uidpoll::constants::GET_UID_COMMAND;
use uidpoll::protocol::{Response, transceive};
use uidpoll::transport::{MockSession, Session};
use uidpoll::Error;

#[test]
fn parse_splits_trailer() {
    let r = Response::parse(&reply(NXP_UID_REPLY)).unwrap();
    assert_eq!(r.data, vec![0x04, 0xa2, 0x3b, 0x1c]);
    assert_eq!(r.status_word(), 0x9000);
    assert!(r.is_success());

    let r = Response::parse(&reply(NOT_SUPPORTED_REPLY)).unwrap();
    assert!(r.data.is_empty());
    assert!(!r.is_success());
}

#[test]
fn one_byte_reply_is_a_transmit_failure() {
    assert!(matches!(
        Response::parse(&[0x90]),
        Err(Error::TransmitFailure(_))
    ));
}

#[test]
fn transceive_sends_get_uid_verbatim() {
    let mut session = MockSession::detached(Ok(reply(ZERO_UID_REPLY)));
    let r = transceive(&mut session, &GET_UID_COMMAND).unwrap();
    assert_eq!(r.data, vec![0, 0, 0]);
    assert_eq!(session.sent(), &[vec![0xFF, 0xCA, 0x00, 0x00, 0x00]]);
    assert_eq!(session.reader().name(), "mock");
}

#[test]
fn transceive_propagates_card_removal() {
    let mut session = MockSession::detached(Err(Error::NoCardPresent));
    assert!(matches!(
        transceive(&mut session, &GET_UID_COMMAND),
        Err(Error::NoCardPresent)
    ));
}
