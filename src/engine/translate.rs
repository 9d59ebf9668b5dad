//! Per-event translation from controller readings to MIDI notes

use std::time::Duration;

use tracing::debug;

use super::midi::{MidiMessage, NoteSink};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::mapping::{map_note, quantize_velocity};
use crate::sources::InputEvent;

/// Notes are wrapped into 0-126 after transposing.
const NOTE_MODULUS: i16 = 127;

/// A note-on and its matching note-off for one pad strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub note_on: MidiMessage,
    pub note_off: MidiMessage,
}

impl Strike {
    pub fn note(&self) -> u8 {
        self.note_on.note()
    }

    pub fn velocity(&self) -> u8 {
        self.note_on.to_bytes()[2]
    }
}

/// What a translation task did with its event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Unmapped channel, non-axis event or pad release
    Ignored,
    /// Note-on and note-off were both written
    Played(Strike),
}

/// Apply a transpose to a note, wrapping modulo 127.
pub fn transpose_note(note: u8, transpose: i8) -> u8 {
    (note as i16 + transpose as i16).rem_euclid(NOTE_MODULUS) as u8
}

/// Work out the messages for one event without sending anything.
///
/// Returns `None` for events that produce no output: non-axis events,
/// channels with no pad, and pads returning to rest. A release does not
/// send its own note-off; every strike already schedules one.
pub fn translate(event: &InputEvent, config: &SessionConfig) -> Option<Strike> {
    let mapped = event.sensor_channel().and_then(map_note)?;

    if event.is_centered() {
        debug!("note off (release ignored) code={:#04x}", event.code);
        return None;
    }

    let velocity = quantize_velocity(event.value);
    let note = transpose_note(mapped, config.transpose);
    debug!("value: {} vel: {}", event.value, velocity);

    Some(Strike {
        note_on: MidiMessage::NoteOn(config.channel, note, velocity),
        note_off: MidiMessage::NoteOff(config.channel, note, 0),
    })
}

/// Send a strike: note-on now, note-off after `hold`.
///
/// The wait only suspends the calling task. If the note-on write fails
/// the note-off is not attempted.
pub async fn play(strike: Strike, sink: &dyn NoteSink, hold: Duration) -> Result<()> {
    send_logged(sink, &strike.note_on)?;
    tokio::time::sleep(hold).await;
    send_logged(sink, &strike.note_off)?;
    Ok(())
}

/// Translate one event and play the result, if any.
pub async fn translate_and_play(
    event: InputEvent,
    config: SessionConfig,
    sink: &dyn NoteSink,
    hold: Duration,
) -> Result<Outcome> {
    match translate(&event, &config) {
        Some(strike) => {
            play(strike, sink, hold).await?;
            Ok(Outcome::Played(strike))
        }
        None => Ok(Outcome::Ignored),
    }
}

fn send_logged(sink: &dyn NoteSink, msg: &MidiMessage) -> Result<()> {
    debug!("Sent {:?}", msg.to_bytes());
    sink.send(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::midi::RecordingSink;
    use crate::error::BridgeError;
    use crate::mapping::{SensorChannel, DRUM_MAP};
    use crate::sources::EventKind;

    fn config(transpose: i8) -> SessionConfig {
        SessionConfig {
            channel: 9,
            transpose,
            verbose: false,
        }
    }

    struct FailingSink;

    impl NoteSink for FailingSink {
        fn send(&self, _msg: &MidiMessage) -> Result<()> {
            Err(BridgeError::Send("port closed".to_string()))
        }
    }

    #[test]
    fn test_transpose_wraps() {
        assert_eq!(transpose_note(38, 0), 38);
        assert_eq!(transpose_note(38, 100), 11);
        assert_eq!(transpose_note(35, -36), 126);
        assert_eq!(transpose_note(89, 38), 0);
    }

    #[test]
    fn test_transpose_always_in_range() {
        for (_, pad) in DRUM_MAP {
            for t in -126..=126 {
                assert!(transpose_note(pad.note(), t) <= 126);
            }
        }
    }

    #[test]
    fn test_translate_strike() {
        let event = InputEvent::axis(SensorChannel::HAT0X, 7);
        let strike = translate(&event, &config(0)).unwrap();

        assert_eq!(strike.note_on, MidiMessage::NoteOn(9, 38, 127));
        assert_eq!(strike.note_off, MidiMessage::NoteOff(9, 38, 0));
        assert_eq!(strike.note(), 38);
        assert_eq!(strike.velocity(), 127);
    }

    #[test]
    fn test_translate_every_pad_and_magnitude() {
        for (channel, pad) in DRUM_MAP {
            for magnitude in 1..=7 {
                let event = InputEvent::axis(channel, magnitude);
                let strike = translate(&event, &config(0)).unwrap();
                assert_eq!(strike.note_on.note(), pad.note());
                assert_eq!(strike.note_off.note(), pad.note());
                assert_eq!(strike.velocity(), quantize_velocity(magnitude));
                assert_eq!(strike.note_off.to_bytes()[2], 0);
            }
        }
    }

    #[test]
    fn test_translate_applies_transpose() {
        let event = InputEvent::axis(SensorChannel::HAT0X, 3);
        let strike = translate(&event, &config(100)).unwrap();
        assert_eq!(strike.note(), 11);
    }

    #[test]
    fn test_translate_ignores_release() {
        let event = InputEvent::axis(SensorChannel::HAT0X, 0);
        assert_eq!(translate(&event, &config(0)), None);
    }

    #[test]
    fn test_translate_ignores_unmapped() {
        assert_eq!(translate(&InputEvent::axis(SensorChannel::HAT1Y, 5), &config(0)), None);
        // Key event sharing a mapped code
        let key = InputEvent::new(EventKind::Key, SensorChannel::HAT0X.0, 1);
        assert_eq!(translate(&key, &config(0)), None);
        let sync = InputEvent::new(EventKind::Sync, 0, 0);
        assert_eq!(translate(&sync, &config(0)), None);
    }

    #[tokio::test]
    async fn test_play_sends_on_then_off() {
        let sink = RecordingSink::new();
        let event = InputEvent::axis(SensorChannel::HAT2Y, 4);

        let outcome = translate_and_play(event, config(0), &sink, Duration::from_millis(5))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Played(s) if s.note() == 49));
        assert_eq!(
            sink.messages(),
            vec![MidiMessage::NoteOn(9, 49, 73), MidiMessage::NoteOff(9, 49, 0)]
        );
    }

    #[tokio::test]
    async fn test_play_holds_between_messages() {
        let sink = RecordingSink::new();
        let strike = translate(&InputEvent::axis(SensorChannel::HAT3X, 2), &config(0)).unwrap();

        let start = std::time::Instant::now();
        play(strike, &sink, Duration::from_millis(40)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_ignored_event_sends_nothing() {
        let sink = RecordingSink::new();
        let event = InputEvent::axis(SensorChannel::HAT0Y, 0);

        let outcome = translate_and_play(event, config(0), &sink, Duration::from_millis(5))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_propagates() {
        let event = InputEvent::axis(SensorChannel::HAT0X, 5);
        let result = translate_and_play(event, config(0), &FailingSink, Duration::ZERO).await;
        assert!(matches!(result, Err(BridgeError::Send(_))));
    }
}
