//! End-to-end translation through the public API

use std::sync::Arc;
use std::time::Duration;

use drum2midi::engine::{MidiMessage, RecordingSink};
use drum2midi::mapping::SensorChannel;
use drum2midi::sources::{InputEvent, ReplaySource};
use drum2midi::{Engine, EngineOptions, EngineState, SessionConfig};

#[tokio::test]
async fn strikes_become_note_pairs_on_the_wire() {
    let config = SessionConfig::new(10, 100, false).unwrap();
    let options = EngineOptions::default().with_hold(Duration::from_millis(10));
    let sink = Arc::new(RecordingSink::new());
    let mut engine = Engine::new(config, options, sink.clone());

    let source = ReplaySource::new(
        "kit",
        vec![
            InputEvent::axis(SensorChannel::HAT0X, 7),
            InputEvent::axis(SensorChannel::HAT0X, 0),
        ],
    );
    let report = engine.run(source).await.unwrap();

    assert_eq!(engine.state(), EngineState::Stopped);
    assert_eq!(report.played, 1);
    assert_eq!(report.ignored, 1);

    let bytes: Vec<[u8; 3]> = sink.messages().iter().map(MidiMessage::to_bytes).collect();
    // snare 38 + 100 wraps to 11 on channel 10
    assert_eq!(bytes, vec![[0x99, 11, 127], [0x89, 11, 0]]);
}

#[tokio::test]
async fn every_submitted_strike_is_delivered() {
    let config = SessionConfig::new(1, 0, false).unwrap();
    let options = EngineOptions::default().with_hold(Duration::from_millis(30));
    let sink = Arc::new(RecordingSink::new());
    let mut engine = Engine::new(config, options, sink.clone());

    let pads = [
        SensorChannel::HAT0X,
        SensorChannel::HAT0Y,
        SensorChannel::HAT1X,
        SensorChannel::HAT2X,
        SensorChannel::HAT2Y,
        SensorChannel::HAT3X,
    ];
    let events: Vec<InputEvent> = (0..40)
        .map(|i| InputEvent::axis(pads[i % pads.len()], 1 + (i % 7) as i32))
        .collect();

    let report = engine.run(ReplaySource::new("burst", events)).await.unwrap();
    assert_eq!(report.received, 40);
    assert_eq!(report.played, 40);

    let messages = sink.messages();
    assert_eq!(messages.len(), 80);
    assert_eq!(messages.iter().filter(|m| m.is_note_on()).count(), 40);
    assert!(messages.iter().all(|m| m.to_bytes()[0] & 0x0F == 0));
}
