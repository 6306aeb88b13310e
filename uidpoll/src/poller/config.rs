// uidpoll/src/poller/config.rs
//! Poll loop configuration

use std::time::Duration;

use crate::{Error, Result};

/// Name given to the background poll thread
pub const DEFAULT_THREAD_NAME: &str = "uid-poller";

/// Default inter-cycle interval: none, poll as fast as the reader answers
pub const DEFAULT_MIN_CYCLE_INTERVAL: Duration = Duration::ZERO;

/// Pause before restarting a panicked poll loop
pub const DEFAULT_RESTART_BACKOFF: Duration = Duration::from_millis(500);

/// Environment variable overriding `min_cycle_interval`, in milliseconds
pub const ENV_MIN_INTERVAL_MS: &str = "UIDPOLL_MIN_INTERVAL_MS";

/// Environment variable enabling restarts: maximum restart count
pub const ENV_MAX_RESTARTS: &str = "UIDPOLL_MAX_RESTARTS";

/// What the worker does when a poll cycle panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RestartPolicy {
    /// Stop the worker; `join` reports the panic.
    #[default]
    Never,
    /// Restart the loop with its state intact, up to `max_restarts`
    /// times, waiting `backoff` before each restart.
    Limited { max_restarts: u32, backoff: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PollConfig {
    /// Lower bound on the duration of one cycle. Zero keeps the tight
    /// poll and only yields the thread between cycles.
    pub min_cycle_interval: Duration,
    pub restart_policy: RestartPolicy,
    pub thread_name: String,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            min_cycle_interval: DEFAULT_MIN_CYCLE_INTERVAL,
            restart_policy: RestartPolicy::default(),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_cycle_interval(mut self, interval: Duration) -> Self {
        self.min_cycle_interval = interval;
        self
    }

    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart_policy = policy;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Defaults overridden by `UIDPOLL_MIN_INTERVAL_MS` and
    /// `UIDPOLL_MAX_RESTARTS` when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_MIN_INTERVAL_MS) {
            let ms = parse_u64(ENV_MIN_INTERVAL_MS, &raw)?;
            config.min_cycle_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(ENV_MAX_RESTARTS) {
            let max = parse_u64(ENV_MAX_RESTARTS, &raw)?;
            let max_restarts = u32::try_from(max).map_err(|_| {
                Error::InvalidConfig(format!("{}={} out of range", ENV_MAX_RESTARTS, max))
            })?;
            config.restart_policy = if max_restarts == 0 {
                RestartPolicy::Never
            } else {
                RestartPolicy::Limited {
                    max_restarts,
                    backoff: DEFAULT_RESTART_BACKOFF,
                }
            };
        }

        Ok(config)
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|e| Error::InvalidConfig(format!("{}={:?}: {}", key, raw, e)))
}
