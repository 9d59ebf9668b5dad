//! Session configuration definitions

use crate::error::{BridgeError, Result};
use std::time::Duration;

/// Highest user-facing MIDI channel number.
pub const MAX_CHANNEL: u8 = 16;

/// Largest transpose amount in either direction.
pub const MAX_TRANSPOSE: i8 = 126;

/// Default channel (General MIDI percussion), user-facing numbering.
pub const DEFAULT_CHANNEL: u8 = 10;

/// Settings read by every translation, fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// MIDI channel, 0-based (0-15)
    pub channel: u8,

    /// Semitone offset applied to every note (-126 to 126)
    pub transpose: i8,

    /// Log every MIDI message sent
    pub verbose: bool,
}

impl SessionConfig {
    /// Build a configuration from user-facing values.
    ///
    /// `channel` is 1-based as musicians count it and is stored 0-based.
    pub fn new(channel: i64, transpose: i64, verbose: bool) -> Result<Self> {
        if !(1..=MAX_CHANNEL as i64).contains(&channel) {
            return Err(BridgeError::InvalidChannel(channel.to_string()));
        }
        if transpose <= -127 || transpose >= 127 {
            return Err(BridgeError::InvalidTranspose(transpose.to_string()));
        }

        Ok(Self {
            channel: (channel - 1) as u8,
            transpose: transpose as i8,
            verbose,
        })
    }

    /// Channel as shown to the user (1-16)
    pub fn display_channel(&self) -> u8 {
        self.channel + 1
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL - 1,
            transpose: 0,
            verbose: false,
        }
    }
}

/// Tuning for the dispatch engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Time between a note-on and its note-off
    pub hold: Duration,

    /// Maximum number of translations running at once
    pub workers: usize,
}

impl EngineOptions {
    pub const DEFAULT_HOLD: Duration = Duration::from_millis(500);
    pub const DEFAULT_WORKERS: usize = 16;

    /// Set the note hold interval (builder pattern)
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    /// Set the worker capacity; zero is raised to one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hold: Self::DEFAULT_HOLD,
            workers: Self::DEFAULT_WORKERS,
        }
    }
}
