//! MIDI output for the drum bridge.
//!
//! Encodes note messages and writes them to a MIDI port.

use std::sync::Mutex;

use midir::{MidiOutput, MidiOutputConnection};
use tracing::info;

use crate::error::{BridgeError, Result};

/// Client name registered with the MIDI subsystem.
const CLIENT_NAME: &str = "Drum2Midi";

/// MIDI message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note on: channel (0-15), note (0-127), velocity (0-127)
    NoteOn(u8, u8, u8),
    /// Note off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff(u8, u8, u8),
}

impl MidiMessage {
    /// Convert to raw MIDI bytes.
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiMessage::NoteOn(ch, note, vel) => [0x90 | (ch & 0x0F), note & 0x7F, vel & 0x7F],
            MidiMessage::NoteOff(ch, note, vel) => [0x80 | (ch & 0x0F), note & 0x7F, vel & 0x7F],
        }
    }

    /// Note number carried by the message
    pub fn note(&self) -> u8 {
        match *self {
            MidiMessage::NoteOn(_, note, _) | MidiMessage::NoteOff(_, note, _) => note,
        }
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, MidiMessage::NoteOn(..))
    }
}

/// Destination for translated MIDI messages.
///
/// Implementations are shared by every translation task and must keep
/// each message intact when writes arrive concurrently.
pub trait NoteSink: Send + Sync {
    /// Write one message. Failures are not retried.
    fn send(&self, msg: &MidiMessage) -> Result<()>;
}

/// Sink writing to a midir output connection.
pub struct MidirSink {
    conn: Mutex<MidiOutputConnection>,
    port_name: String,
}

impl MidirSink {
    /// Create a virtual output port other applications can connect to.
    #[cfg(unix)]
    pub fn open_virtual(port_name: &str) -> Result<Self> {
        use midir::os::unix::VirtualOutput;

        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        let conn = midi_out.create_virtual(port_name)?;
        info!("Opened virtual port \"{}\"", port_name);

        Ok(Self {
            conn: Mutex::new(conn),
            port_name: port_name.to_string(),
        })
    }

    /// Connect to the first existing output port whose name starts with `prefix`.
    pub fn connect(prefix: &str) -> Result<Self> {
        let midi_out = MidiOutput::new(CLIENT_NAME)?;

        let port = midi_out
            .ports()
            .into_iter()
            .find(|p| {
                midi_out
                    .port_name(p)
                    .map(|n| n.starts_with(prefix))
                    .unwrap_or(false)
            })
            .ok_or_else(|| BridgeError::PortNotFound(prefix.to_string()))?;

        let port_name = midi_out.port_name(&port)?;
        let conn = midi_out.connect(&port, "drum2midi-output")?;
        info!("Connected to port \"{}\"", port_name);

        Ok(Self {
            conn: Mutex::new(conn),
            port_name,
        })
    }

    /// Name of the port this sink writes to
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Close the connection.
    pub fn close(self) {
        if let Ok(conn) = self.conn.into_inner() {
            let _ = conn.close();
        }
    }
}

impl NoteSink for MidirSink {
    fn send(&self, msg: &MidiMessage) -> Result<()> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| BridgeError::Send("output connection poisoned".to_string()))?;
        conn.send(&msg.to_bytes())?;
        Ok(())
    }
}

/// Sink that keeps every message in memory.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<MidiMessage>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all messages received so far, in arrival order
    pub fn messages(&self) -> Vec<MidiMessage> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NoteSink for RecordingSink {
    fn send(&self, msg: &MidiMessage) -> Result<()> {
        self.messages
            .lock()
            .map_err(|_| BridgeError::Send("recording poisoned".to_string()))?
            .push(*msg);
        Ok(())
    }
}

/// List available MIDI output ports.
pub fn list_midi_ports() -> Result<Vec<String>> {
    let midi_out = MidiOutput::new("Drum2Midi List")?;
    let ports = midi_out.ports();

    let names: Vec<String> = ports
        .iter()
        .filter_map(|p| midi_out.port_name(p).ok())
        .collect();

    Ok(names)
}
