//! Board runtime configuration.

use crate::clock::driver::DEFAULT_TICK_INTERVAL;
use crate::persistence::DEFAULT_STORAGE_KEY;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStorageKey,
    ZeroTickInterval,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage key cannot be empty"),
            Self::ZeroTickInterval => write!(f, "tick interval must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}

/// Settings for one board session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Store key holding every saved note.
    pub storage_key: String,
    /// Delay between heartbeat ticks.
    pub tick_interval: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl BoardConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}
