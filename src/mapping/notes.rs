//! Fixed pad-to-note table

/// Axis code of one drum sensor, as reported by the input layer.
///
/// Codes follow the Linux absolute-axis numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SensorChannel(pub u16);

impl SensorChannel {
    pub const HAT0X: SensorChannel = SensorChannel(0x10);
    pub const HAT0Y: SensorChannel = SensorChannel(0x11);
    pub const HAT1X: SensorChannel = SensorChannel(0x12);
    pub const HAT1Y: SensorChannel = SensorChannel(0x13);
    pub const HAT2X: SensorChannel = SensorChannel(0x14);
    pub const HAT2Y: SensorChannel = SensorChannel(0x15);
    pub const HAT3X: SensorChannel = SensorChannel(0x16);
    pub const HAT3Y: SensorChannel = SensorChannel(0x17);
}

/// Drum pads of the controller with their General MIDI note numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumPad {
    Snare,
    HighTom,
    LowTom,
    HiHat,
    Crash,
    BassDrum,
}

impl DrumPad {
    /// General MIDI percussion note for this pad
    pub fn note(self) -> u8 {
        match self {
            DrumPad::Snare => 38,
            DrumPad::HighTom => 48,
            DrumPad::LowTom => 41,
            DrumPad::HiHat => 42,
            DrumPad::Crash => 49,
            DrumPad::BassDrum => 35,
        }
    }

    /// Pad wired to the given sensor channel, if any
    pub fn from_channel(channel: SensorChannel) -> Option<Self> {
        DRUM_MAP
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, pad)| *pad)
    }
}

/// Sensor channel to pad wiring of the reference controller.
pub const DRUM_MAP: [(SensorChannel, DrumPad); 6] = [
    (SensorChannel::HAT0X, DrumPad::Snare),
    (SensorChannel::HAT0Y, DrumPad::HighTom),
    (SensorChannel::HAT1X, DrumPad::LowTom),
    (SensorChannel::HAT2X, DrumPad::HiHat),
    (SensorChannel::HAT2Y, DrumPad::Crash),
    (SensorChannel::HAT3X, DrumPad::BassDrum),
];

/// Note number for a sensor channel, or `None` when nothing is wired to it.
pub fn map_note(channel: SensorChannel) -> Option<u8> {
    DrumPad::from_channel(channel).map(DrumPad::note)
}
