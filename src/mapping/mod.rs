//! Mapping from drum sensor readings to MIDI note parameters
//!
//! Pads map to General MIDI percussion notes and strike magnitudes
//! scale up to MIDI velocities.

mod notes;
mod quantize;

pub use notes::{map_note, DrumPad, SensorChannel, DRUM_MAP};
pub use quantize::{quantize_velocity, MAX_MAGNITUDE, MAX_VELOCITY};
