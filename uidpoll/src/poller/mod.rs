// uidpoll/src/poller/mod.rs
//! The poll loop: enumerate, connect, GET UID, synthesize, publish.

mod cancel;
pub mod config;
mod worker;

use std::thread;
use std::time::Instant;

pub use cancel::CancellationToken;
pub use config::{PollConfig, RestartPolicy};
pub use worker::{PollerHandle, spawn};
#[cfg(feature = "pcsc")]
pub use worker::spawn_pcsc;

use crate::constants::GET_UID_COMMAND;
use crate::handoff::UidSink;
use crate::protocol::{synthesize, transceive};
use crate::transport::ReaderSubsystem;
use crate::types::SynthesizedUid;
use crate::{Error, Result};

/// Per-reason counters kept across cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub published: u64,
    pub no_reader: u64,
    pub enumeration_failures: u64,
    pub reader_unavailable: u64,
    pub connect_failures: u64,
    pub no_card: u64,
    pub transmit_failures: u64,
    pub unexpected_status: u64,
    /// Errors outside the per-cycle taxonomy, e.g. from a custom subsystem
    pub other_failures: u64,
    pub restarts: u32,
}

impl PollStats {
    /// Cycles that ended without publishing.
    pub fn skipped(&self) -> u64 {
        self.cycles - self.published
    }

    fn record(&mut self, err: &Error) {
        match err {
            Error::NoReaderPresent => self.no_reader += 1,
            Error::EnumerationFailure(_) => self.enumeration_failures += 1,
            Error::ReaderUnavailable { .. } => self.reader_unavailable += 1,
            Error::NoCardPresent => self.no_card += 1,
            Error::TransmitFailure(_) => self.transmit_failures += 1,
            Error::UnexpectedStatus { .. } => self.unexpected_status += 1,
            Error::ConnectFailure { .. } => self.connect_failures += 1,
            _ => self.other_failures += 1,
        }
    }
}

/// Drives one reader subsystem and delivers each UID to a sink.
///
/// The poller owns no session between cycles: every cycle connects
/// afresh and the session is dropped before the cycle returns.
pub struct Poller<S, K> {
    subsystem: S,
    sink: K,
    config: PollConfig,
    stats: PollStats,
}

impl<S, K> Poller<S, K>
where
    S: ReaderSubsystem,
    K: UidSink,
{
    pub fn new(subsystem: S, sink: K) -> Self {
        Self {
            subsystem,
            sink,
            config: PollConfig::default(),
            stats: PollStats::default(),
        }
    }

    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    /// Run a single cycle. `Ok` carries the UID that was published; `Err`
    /// says why nothing was published. Errors are never fatal to the loop.
    pub fn run_cycle(&mut self) -> Result<SynthesizedUid> {
        self.stats.cycles += 1;
        match self.read_uid() {
            Ok(uid) => {
                self.sink.publish(uid);
                self.stats.published += 1;
                Ok(uid)
            }
            Err(e) => {
                self.stats.record(&e);
                Err(e)
            }
        }
    }

    fn read_uid(&mut self) -> Result<SynthesizedUid> {
        let readers = self.subsystem.enumerate()?;
        // Only the first reader is polled.
        let reader = readers.first().ok_or(Error::NoReaderPresent)?;

        let mut session = self.subsystem.connect(reader)?;
        let response = transceive(session.as_mut(), &GET_UID_COMMAND)?;
        drop(session);

        synthesize(&response)
    }

    /// Cycle until `cancel` fires and return the accumulated stats.
    pub fn run(&mut self, cancel: &CancellationToken) -> PollStats {
        log::debug!(
            "poll loop started, min cycle interval {:?}",
            self.config.min_cycle_interval
        );
        while !cancel.is_cancelled() {
            let started = Instant::now();
            match self.run_cycle() {
                Ok(uid) => log::debug!("card uid {} ({})", uid, uid.to_hex()),
                Err(e @ (Error::NoReaderPresent | Error::NoCardPresent)) => {
                    log::trace!("cycle skipped: {}", e)
                }
                Err(e) => log::debug!("cycle skipped: {}", e),
            }
            self.pace(started, cancel);
        }
        log::debug!("poll loop stopped after {} cycles", self.stats.cycles);
        self.stats.clone()
    }

    fn pace(&self, started: Instant, cancel: &CancellationToken) {
        match self
            .config
            .min_cycle_interval
            .checked_sub(started.elapsed())
        {
            Some(remaining) if !remaining.is_zero() => {
                cancel.wait_timeout(remaining);
            }
            _ => thread::yield_now(),
        }
    }

    pub(crate) fn note_restart(&mut self) {
        self.stats.restarts += 1;
    }
}
