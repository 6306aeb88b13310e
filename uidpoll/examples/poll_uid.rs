// Print the UID of every card placed on the first PC/SC reader.
//
// Usage:
//   RUST_LOG=uidpoll=debug cargo run -p uidpoll --example poll_uid --features pcsc
//
// UIDPOLL_MIN_INTERVAL_MS and UIDPOLL_MAX_RESTARTS tune the poll loop.
// Ctrl-D (end of stdin) stops it.

use std::io::Read;
use std::thread;

use anyhow::Context;
use uidpoll::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = PollConfig::from_env().context("reading poll configuration")?;
    let (tx, rx) = uid_channel();
    let handle = spawn_pcsc(config, tx).context("starting PC/SC poller")?;
    let token = handle.cancellation_token();

    // Stop on end of input.
    thread::spawn(move || {
        let mut sink = Vec::new();
        let _ = std::io::stdin().read_to_end(&mut sink);
        token.cancel();
    });

    println!("Waiting for cards (Ctrl-D to quit)...");
    let mut last: Option<SynthesizedUid> = None;
    loop {
        match rx.recv() {
            Ok(uid) => {
                // The loop republishes a card that stays on the reader.
                if last != Some(uid) {
                    println!("UID {} (hex {})", uid, uid.to_hex());
                    last = Some(uid);
                }
            }
            Err(Error::ChannelClosed) => break,
            Err(e) => return Err(e.into()),
        }
    }

    let stats = handle.join()?;
    println!(
        "{} cycles, {} published, {} skipped",
        stats.cycles,
        stats.published,
        stats.skipped()
    );
    Ok(())
}
