//! drum2midi - Drum controller to MIDI bridge
//!
//! Turns pad strikes read from a motion-sensing drum controller into
//! MIDI note-on/note-off pairs. Each strike is translated on its own
//! task so a held note never delays the next hit.

pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod sources;

pub use config::{EngineOptions, SessionConfig};
pub use engine::{DispatchReport, Engine, EngineState, ShutdownHandle};
pub use error::BridgeError;
