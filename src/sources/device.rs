//! Linux evdev input source
//!
//! Reads kernel input events from a `/dev/input/event*` device.

use super::{EventKind, EventSource, InputEvent};
use crate::error::Result;
use evdev::Device;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// errno reported by reads once the device has been unplugged
const ENODEV: i32 = 19;

/// Input device available on this machine
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub path: PathBuf,
    pub name: String,
}

/// Source reading events from an evdev device
pub struct EvdevSource {
    name: String,
    device: Device,
    grabbed: bool,
    pending: VecDeque<InputEvent>,
}

impl EvdevSource {
    /// Open a device, optionally grabbing it so no other reader sees its events.
    pub fn open(path: &Path, grab: bool) -> Result<Self> {
        let mut device = Device::open(path)?;
        let name = device
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());

        if grab {
            device.grab()?;
            info!("Grabbed input device {}", name);
        }

        Ok(Self {
            name,
            device,
            grabbed: grab,
            pending: VecDeque::new(),
        })
    }

    /// Release an exclusive grab taken at open
    pub fn release(&mut self) {
        if self.grabbed {
            if let Err(e) = self.device.ungrab() {
                warn!("Failed to release {}: {}", self.name, e);
            }
            self.grabbed = false;
            debug!("Released input device {}", self.name);
        }
    }
}

impl EventSource for EvdevSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_event(&mut self) -> Result<Option<InputEvent>> {
        while self.pending.is_empty() {
            let batch = match self.device.fetch_events() {
                Ok(batch) => batch,
                Err(e) if is_disconnect(&e) => {
                    info!("Input device {} disconnected", self.name);
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            self.pending.extend(batch.map(|ev| {
                InputEvent::new(EventKind::from_raw(ev.event_type().0), ev.code(), ev.value())
            }));
        }

        Ok(self.pending.pop_front())
    }
}

impl Drop for EvdevSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// True when a read failed because the controller went away.
fn is_disconnect(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(ENODEV)
}

/// List input devices this process can open.
pub fn list_input_devices() -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = evdev::enumerate()
        .map(|(path, device)| DeviceInfo {
            name: device.name().unwrap_or("Unknown").to_string(),
            path,
        })
        .collect();
    devices.sort_by(|a, b| a.path.cmp(&b.path));
    devices
}
