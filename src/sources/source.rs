//! EventSource trait and InputEvent definition

use crate::error::Result;
use crate::mapping::SensorChannel;
use std::collections::VecDeque;

/// Kind of input event, following the Linux input event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Sync,
    Key,
    Relative,
    /// Axis position; drum pads report strikes this way
    Absolute,
    Other(u16),
}

impl EventKind {
    /// Convert a raw event type number
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0x00 => EventKind::Sync,
            0x01 => EventKind::Key,
            0x02 => EventKind::Relative,
            0x03 => EventKind::Absolute,
            other => EventKind::Other(other),
        }
    }
}

/// One event read from the drum controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: EventKind,

    /// Axis or key code
    pub code: u16,

    /// Strike magnitude for axis events; 0 means the pad is back at rest
    pub value: i32,
}

impl InputEvent {
    /// Create an event from raw type, code and value
    pub fn new(kind: EventKind, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// Create an axis event on a sensor channel
    pub fn axis(channel: SensorChannel, value: i32) -> Self {
        Self::new(EventKind::Absolute, channel.0, value)
    }

    /// Sensor channel for axis events, `None` for everything else
    pub fn sensor_channel(&self) -> Option<SensorChannel> {
        match self.kind {
            EventKind::Absolute => Some(SensorChannel(self.code)),
            _ => None,
        }
    }

    /// True when a pad reports it has returned to rest
    pub fn is_centered(&self) -> bool {
        self.value == 0
    }
}

/// A blocking, non-restartable stream of input events
pub trait EventSource: Send {
    /// Get a human-readable name for this source
    fn name(&self) -> &str;

    /// Block until the next event arrives.
    ///
    /// Returns `Ok(None)` once the stream has ended.
    fn next_event(&mut self) -> Result<Option<InputEvent>>;
}

/// Source that replays a fixed list of events, then ends
pub struct ReplaySource {
    name: String,
    events: VecDeque<InputEvent>,
}

impl ReplaySource {
    /// Create a replay source
    pub fn new(name: impl Into<String>, events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            name: name.into(),
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for ReplaySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_event(&mut self) -> Result<Option<InputEvent>> {
        Ok(self.events.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_from_raw() {
        assert_eq!(EventKind::from_raw(0), EventKind::Sync);
        assert_eq!(EventKind::from_raw(3), EventKind::Absolute);
        assert_eq!(EventKind::from_raw(0x15), EventKind::Other(0x15));
    }

    #[test]
    fn test_axis_event() {
        let event = InputEvent::axis(SensorChannel::HAT2X, 5);
        assert_eq!(event.sensor_channel(), Some(SensorChannel::HAT2X));
        assert!(!event.is_centered());
        assert!(InputEvent::axis(SensorChannel::HAT2X, 0).is_centered());
    }

    #[test]
    fn test_non_axis_has_no_channel() {
        let event = InputEvent::new(EventKind::Key, 0x130, 1);
        assert_eq!(event.sensor_channel(), None);
    }

    #[test]
    fn test_replay_source_ends() {
        let mut source = ReplaySource::new(
            "replay",
            vec![
                InputEvent::axis(SensorChannel::HAT0X, 3),
                InputEvent::axis(SensorChannel::HAT0X, 0),
            ],
        );

        assert_eq!(source.name(), "replay");
        assert_eq!(source.next_event().unwrap().unwrap().value, 3);
        assert_eq!(source.next_event().unwrap().unwrap().value, 0);
        assert!(source.next_event().unwrap().is_none());
        assert!(source.next_event().unwrap().is_none());
    }
}
