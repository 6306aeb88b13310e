// uidpoll/src/transport/mock.rs

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::transport::traits::{ReaderSubsystem, Session};
use crate::types::ReaderHandle;
use crate::{Error, Result};

/// Shared state behind a [`MockReaderSubsystem`] and the sessions it hands
/// out. Tests keep a clone of the subsystem to inspect it after the
/// original has moved into a poller.
#[derive(Debug, Default)]
pub struct MockState {
    pub readers: Vec<ReaderHandle>,
    pub enumerate_failures: VecDeque<Error>,
    pub connect_failures: VecDeque<Error>,
    pub replies: VecDeque<Result<Vec<u8>>>,
    /// Every command transmitted on any session, in order
    pub sent: Vec<Vec<u8>>,
    /// Reader passed to each successful connect
    pub connected: Vec<ReaderHandle>,
    pub enumerations: usize,
    pub connects: usize,
    pub sessions_open: usize,
    pub max_sessions_open: usize,
}

/// Mock reader subsystem for unit tests. It returns scripted readers,
/// failures and replies, and counts open sessions.
#[derive(Debug, Clone, Default)]
pub struct MockReaderSubsystem {
    state: Arc<Mutex<MockState>>,
}

impl MockReaderSubsystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_readers(names: &[&str]) -> Self {
        let mock = Self::new();
        mock.set_readers(names);
        mock
    }

    pub fn set_readers(&self, names: &[&str]) {
        self.state.lock().readers = names.iter().map(|n| ReaderHandle::from(*n)).collect();
    }

    /// Queue a raw reply (payload followed by SW1 SW2) for the next transmit.
    pub fn push_reply(&self, raw: Vec<u8>) {
        self.state.lock().replies.push_back(Ok(raw));
    }

    pub fn push_transmit_error(&self, err: Error) {
        self.state.lock().replies.push_back(Err(err));
    }

    pub fn push_connect_error(&self, err: Error) {
        self.state.lock().connect_failures.push_back(err);
    }

    pub fn push_enumerate_error(&self, err: Error) {
        self.state.lock().enumerate_failures.push_back(err);
    }

    pub fn sessions_open(&self) -> usize {
        self.state.lock().sessions_open
    }

    pub fn max_sessions_open(&self) -> usize {
        self.state.lock().max_sessions_open
    }

    pub fn connects(&self) -> usize {
        self.state.lock().connects
    }

    pub fn enumerations(&self) -> usize {
        self.state.lock().enumerations
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().sent.clone()
    }

    pub fn connected(&self) -> Vec<ReaderHandle> {
        self.state.lock().connected.clone()
    }
}

impl ReaderSubsystem for MockReaderSubsystem {
    fn enumerate(&mut self) -> Result<Vec<ReaderHandle>> {
        let mut state = self.state.lock();
        state.enumerations += 1;
        if let Some(err) = state.enumerate_failures.pop_front() {
            return Err(err);
        }
        Ok(state.readers.clone())
    }

    fn connect(&mut self, reader: &ReaderHandle) -> Result<Box<dyn Session>> {
        let mut state = self.state.lock();
        if let Some(err) = state.connect_failures.pop_front() {
            return Err(err);
        }
        // Mirror the platform: a handle that is no longer listed is stale.
        if !state.readers.contains(reader) {
            return Err(Error::ReaderUnavailable {
                reader: reader.to_string(),
                reason: "unknown reader".to_string(),
            });
        }
        state.connects += 1;
        state.connected.push(reader.clone());
        state.sessions_open += 1;
        state.max_sessions_open = state.max_sessions_open.max(state.sessions_open);
        drop(state);

        Ok(Box::new(MockSession {
            reader: reader.clone(),
            state: Arc::clone(&self.state),
            sent: Vec::new(),
        }))
    }
}

/// Session handed out by [`MockReaderSubsystem`]. Pops one queued reply
/// per transmit; an empty queue behaves like a reader with no card.
#[derive(Debug)]
pub struct MockSession {
    reader: ReaderHandle,
    state: Arc<Mutex<MockState>>,
    sent: Vec<Vec<u8>>,
}

impl MockSession {
    /// A standalone session with a single scripted reply, for tests that
    /// exercise the transceiver without a subsystem.
    pub fn detached(reply: Result<Vec<u8>>) -> Self {
        let state = MockState {
            replies: VecDeque::from([reply]),
            sessions_open: 1,
            max_sessions_open: 1,
            ..MockState::default()
        };
        Self {
            reader: ReaderHandle::from("mock"),
            state: Arc::new(Mutex::new(state)),
            sent: Vec::new(),
        }
    }

    /// Commands transmitted on this session
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

impl Session for MockSession {
    fn reader(&self) -> &ReaderHandle {
        &self.reader
    }

    fn transmit(&mut self, command: &[u8]) -> Result<Vec<u8>> {
        self.sent.push(command.to_vec());
        let mut state = self.state.lock();
        state.sent.push(command.to_vec());
        state
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(Error::NoCardPresent))
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.sessions_open = state.sessions_open.saturating_sub(1);
    }
}
