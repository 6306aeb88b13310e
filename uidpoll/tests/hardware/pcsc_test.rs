#![cfg(feature = "pcsc")]

#[path = "../common/mod.rs"]
mod common;

use serial_test::serial;
use uidpoll::transport::{PcscSubsystem, ReaderSubsystem};
use uidpoll::{Error, PollConfig, Poller, spawn_pcsc, uid_channel};

// These tests talk to the host's PC/SC service and are marked `#[ignore]`
// so CI does not attempt to run them. Run manually, with a reader
// attached and a card on it, with:
//
// cargo test -p uidpoll --test hardware --features pcsc -- --ignored

#[test]
#[ignore]
#[serial]
fn list_readers() -> anyhow::Result<()> {
    common::init_logging();
    let mut pcsc = PcscSubsystem::establish()?;
    for reader in pcsc.enumerate()? {
        println!("reader: {}", reader);
    }
    Ok(())
}

#[test]
#[ignore]
#[serial]
fn single_cycle_against_first_reader() -> anyhow::Result<()> {
    common::init_logging();
    let pcsc = PcscSubsystem::establish()?;
    let (tx, rx) = uid_channel();
    let mut poller = Poller::new(pcsc, tx);
    match poller.run_cycle() {
        Ok(uid) => {
            println!("uid {} ({})", uid, uid.to_hex());
            assert_eq!(rx.try_recv(), Some(uid));
        }
        // no reader or no card on the bench is not a failure
        Err(Error::NoReaderPresent | Error::NoCardPresent) => {}
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

#[test]
#[ignore]
#[serial]
fn background_poll_reports_a_card() -> anyhow::Result<()> {
    common::init_logging();
    let (tx, rx) = uid_channel();
    let handle = spawn_pcsc(PollConfig::from_env()?, tx)?;
    let seen = rx.recv_timeout(std::time::Duration::from_secs(10))?;
    handle.cancel();
    let stats = handle.join()?;
    println!("seen {:?}, stats {:?}", seen.map(|u| u.to_string()), stats);
    Ok(())
}
