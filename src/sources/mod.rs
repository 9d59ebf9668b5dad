//! Input event sources
//!
//! Sources produce the raw event stream read from the drum controller.
//! The dispatch engine pulls from them on a dedicated reader thread.

#[cfg(target_os = "linux")]
mod device;
mod source;

#[cfg(target_os = "linux")]
pub use device::{list_input_devices, DeviceInfo, EvdevSource};
pub use source::{EventKind, EventSource, InputEvent, ReplaySource};
