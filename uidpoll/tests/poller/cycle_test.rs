#[path = "../common/mod.rs"]
mod common;

use common::fixtures::*;
use uidpoll::test_support::{mock_with_hex_replies, status_reply, success_reply};
use uidpoll::transport::MockReaderSubsystem;
use uidpoll::{Error, Poller, SynthesizedUid, uid_channel};

#[test]
fn one_cycle_publishes_decimal_uid() {
    common::init_logging();
    let mock = mock_with_hex_replies("ACS ACR122U 00 00", &[ZERO_UID_REPLY]).unwrap();
    let (tx, rx) = uid_channel();
    let mut poller = Poller::new(mock.clone(), tx);

    poller.run_cycle().unwrap();
    assert_eq!(rx.try_recv().unwrap().to_string(), ZERO_UID_DECIMAL);
    assert_eq!(mock.sessions_open(), 0);
}

#[test]
fn no_reader_means_no_connect_and_no_publish() {
    let mock = MockReaderSubsystem::new();
    let (tx, rx) = uid_channel();
    let mut poller = Poller::new(mock.clone(), tx);

    for _ in 0..3 {
        assert!(matches!(poller.run_cycle(), Err(Error::NoReaderPresent)));
    }
    assert_eq!(mock.enumerations(), 3);
    assert_eq!(mock.connects(), 0);
    assert_eq!(rx.try_recv(), None);
}

#[test]
fn reader_plugged_in_later_is_picked_up() {
    let mock = MockReaderSubsystem::new();
    let (tx, rx) = uid_channel();
    let mut poller = Poller::new(mock.clone(), tx);

    assert!(poller.run_cycle().is_err());
    mock.set_readers(&["late reader"]);
    mock.push_reply(success_reply(&[0x04, 0xa2, 0x3b]));
    poller.run_cycle().unwrap();
    assert_eq!(rx.try_recv().unwrap().as_bytes(), &NXP_UID_BYTES);
}

#[test]
fn every_cycle_releases_its_session() {
    let mock = MockReaderSubsystem::with_readers(&["r0"]);
    mock.push_reply(success_reply(&[1, 2, 3]));
    mock.push_reply(status_reply(0x6b, 0x00));
    mock.push_transmit_error(Error::TransmitFailure("reader timeout".into()));
    mock.push_reply(vec![0x90]);
    mock.push_reply(success_reply(&[4, 5, 6]));

    let mut collected: Vec<SynthesizedUid> = Vec::new();
    let mut poller = Poller::new(mock.clone(), |uid: SynthesizedUid| collected.push(uid));
    let results: Vec<bool> = (0..6).map(|_| poller.run_cycle().is_ok()).collect();
    let stats = poller.stats().clone();
    drop(poller);

    assert_eq!(results, vec![true, false, false, false, true, false]);
    assert_eq!(collected.len(), 2);
    assert_eq!(mock.connects(), 6);
    assert_eq!(mock.sessions_open(), 0);
    assert_eq!(mock.max_sessions_open(), 1);
    assert_eq!(stats.published, 2);
    assert_eq!(stats.unexpected_status, 1);
    assert_eq!(stats.transmit_failures, 2);
    assert_eq!(stats.no_card, 1);
}

#[test]
fn slow_consumer_sees_only_latest() {
    let mock = mock_with_hex_replies("r0", &["11 00 00 90 00", "22 00 00 90 00", "33 00 00 90 00"])
        .unwrap();
    let (tx, rx) = uid_channel();
    let mut poller = Poller::new(mock, tx);
    for _ in 0..3 {
        poller.run_cycle().unwrap();
    }

    assert_eq!(rx.try_recv().unwrap().card_bytes(), [0x33, 0x00, 0x00]);
    assert_eq!(rx.try_recv(), None);
    assert_eq!(rx.published(), 3);
    assert_eq!(rx.overwritten(), 2);
}

#[test]
fn unlisted_reader_is_reported_unavailable() {
    let mock = MockReaderSubsystem::with_readers(&["r0"]);
    mock.push_connect_error(Error::ReaderUnavailable {
        reader: "r0".into(),
        reason: "sharing violation".into(),
    });
    let mut poller = Poller::new(mock, |_uid: SynthesizedUid| {});
    assert!(matches!(
        poller.run_cycle(),
        Err(Error::ReaderUnavailable { .. })
    ));
    assert_eq!(poller.stats().reader_unavailable, 1);
}
