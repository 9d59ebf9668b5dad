//! Error types for the drum bridge.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid channel number {0:?} (expected 1-16)")]
    InvalidChannel(String),

    #[error("Invalid transpose amount {0:?} (expected -126 to 126)")]
    InvalidTranspose(String),

    #[error("No MIDI output ports found matching \"{0}\"")]
    PortNotFound(String),

    #[error("MIDI output error: {0}")]
    MidiOutput(String),

    #[error("Input device error: {0}")]
    Device(#[from] std::io::Error),

    #[error("MIDI send failed: {0}")]
    Send(String),

    #[error("Dispatch engine has already run")]
    EngineStopped,
}

/// Process exit codes. `0` is a graceful shutdown, end of input or interrupt.
pub mod exit {
    /// No device given, or the engine was misused
    pub const USAGE: u8 = 1;
    /// Channel or transpose out of range
    pub const CONFIG: u8 = 2;
    /// `--connect` matched no output port
    pub const PORT_NOT_FOUND: u8 = 3;
    /// MIDI output could not be opened or written
    pub const OUTPUT: u8 = 4;
    /// Input device could not be opened or read
    pub const DEVICE: u8 = 5;
}

impl BridgeError {
    /// Process exit code for an error that ends the program.
    pub fn exit_code(&self) -> u8 {
        match self {
            BridgeError::InvalidChannel(_) | BridgeError::InvalidTranspose(_) => exit::CONFIG,
            BridgeError::PortNotFound(_) => exit::PORT_NOT_FOUND,
            BridgeError::MidiOutput(_) | BridgeError::Send(_) => exit::OUTPUT,
            BridgeError::Device(_) => exit::DEVICE,
            BridgeError::EngineStopped => exit::USAGE,
        }
    }
}

impl From<midir::InitError> for BridgeError {
    fn from(e: midir::InitError) -> Self {
        BridgeError::MidiOutput(e.to_string())
    }
}

impl From<midir::ConnectError<midir::MidiOutput>> for BridgeError {
    fn from(e: midir::ConnectError<midir::MidiOutput>) -> Self {
        BridgeError::MidiOutput(e.to_string())
    }
}

impl From<midir::PortInfoError> for BridgeError {
    fn from(e: midir::PortInfoError) -> Self {
        BridgeError::MidiOutput(e.to_string())
    }
}

impl From<midir::SendError> for BridgeError {
    fn from(e: midir::SendError) -> Self {
        BridgeError::Send(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
