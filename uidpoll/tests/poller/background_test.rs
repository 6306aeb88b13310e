#[path = "../common/mod.rs"]
mod common;

use std::time::{Duration, Instant};

use common::fixtures::*;
use uidpoll::test_support::mock_with_hex_replies;
use uidpoll::transport::MockReaderSubsystem;
use uidpoll::{Error, PollConfig, Poller, RestartPolicy, SynthesizedUid, spawn, uid_channel};

#[test]
fn background_poller_delivers_then_closes() {
    common::init_logging();
    let mock = mock_with_hex_replies("r0", &[NXP_UID_REPLY]).unwrap();
    let (tx, rx) = uid_channel();
    let handle = spawn(Poller::new(mock.clone(), tx)).unwrap();

    let uid = rx.recv_timeout(common::WAIT).unwrap().unwrap();
    assert_eq!(uid.as_bytes(), &NXP_UID_BYTES);
    assert!(!handle.is_finished());

    handle.cancel();
    let stats = handle.join().unwrap();
    assert_eq!(stats.published, 1);
    assert_eq!(mock.sessions_open(), 0);
    assert!(matches!(rx.recv(), Err(Error::ChannelClosed)));
}

#[test]
fn dropping_handle_stops_the_thread() {
    let mock = MockReaderSubsystem::with_readers(&["r0"]);
    let (tx, rx) = uid_channel();
    let handle = spawn(Poller::new(mock, tx)).unwrap();
    drop(handle);
    // The publisher goes away with the stopped poller.
    assert!(matches!(rx.recv_timeout(common::WAIT), Err(Error::ChannelClosed)));
}

#[test]
fn cancel_cuts_a_long_pacing_wait_short() {
    let mock = MockReaderSubsystem::with_readers(&["r0"]);
    let config = PollConfig::new().with_min_cycle_interval(Duration::from_secs(60));
    let poller = Poller::new(mock.clone(), |_uid: SynthesizedUid| {}).with_config(config);
    let handle = spawn(poller).unwrap();

    while mock.enumerations() == 0 {
        std::thread::sleep(Duration::from_millis(1));
    }
    let start = Instant::now();
    handle.cancel();
    let stats = handle.join().unwrap();
    assert!(start.elapsed() < common::WAIT);
    assert_eq!(stats.cycles, 1);
}

#[test]
fn consumer_can_stop_the_loop_from_its_side() {
    let mock = mock_with_hex_replies("r0", &[ZERO_UID_REPLY]).unwrap();
    let (tx, rx) = uid_channel();
    let handle = spawn(Poller::new(mock, tx)).unwrap();
    let token = handle.cancellation_token();

    let uid = rx.recv().unwrap();
    assert_eq!(uid.to_string(), ZERO_UID_DECIMAL);
    token.cancel();
    assert!(handle.join().is_ok());
}

#[test]
fn unbounded_interval_and_backoff_do_not_end_the_worker() {
    let mock = MockReaderSubsystem::with_readers(&["r0"]);
    let config = PollConfig::new()
        .with_min_cycle_interval(Duration::MAX)
        .with_restart_policy(RestartPolicy::Limited {
            max_restarts: 1,
            backoff: Duration::MAX,
        });
    let poller = Poller::new(mock.clone(), |_uid: SynthesizedUid| {}).with_config(config);
    let handle = spawn(poller).unwrap();

    while mock.enumerations() == 0 {
        std::thread::sleep(Duration::from_millis(1));
    }
    std::thread::sleep(Duration::from_millis(20));
    assert!(!handle.is_finished());
    handle.cancel();
    let stats = handle.join().unwrap();
    assert_eq!(stats.cycles, 1);
}
