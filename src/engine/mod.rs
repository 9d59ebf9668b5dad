//! Dispatch engine for the drum bridge
//!
//! Reads controller events on a dedicated thread and fans each one out
//! to a bounded pool of translation tasks that write to a shared sink.

pub mod midi;
pub mod translate;

pub use midi::{list_midi_ports, MidiMessage, MidirSink, NoteSink, RecordingSink};
pub use translate::{play, transpose_note, translate, translate_and_play, Outcome, Strike};

use std::sync::Arc;
use std::thread;

use tokio::sync::{mpsc, watch, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::{EngineOptions, SessionConfig};
use crate::error::{BridgeError, Result};
use crate::sources::{EventSource, InputEvent};

/// Events buffered between the reader thread and the dispatcher.
const EVENT_QUEUE: usize = 256;

/// Lifecycle of an engine. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Draining,
    Stopped,
}

/// Summary of one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Events read from the source
    pub received: usize,
    /// Events handed to a translation task
    pub dispatched: usize,
    /// Events that produced a note-on/note-off pair
    pub played: usize,
    /// Events that produced nothing
    pub ignored: usize,
    /// Tasks that hit a sink error or panicked
    pub failed: usize,
    /// Read error that ended the input stream early
    pub input_error: Option<String>,
}

impl DispatchReport {
    fn record(&mut self, result: std::result::Result<Result<Outcome>, JoinError>) {
        match result {
            Ok(Ok(Outcome::Played(_))) => self.played += 1,
            Ok(Ok(Outcome::Ignored)) => self.ignored += 1,
            Ok(Err(e)) => {
                warn!("Translation failed: {}", e);
                self.failed += 1;
            }
            Err(e) => {
                error!("Translation task aborted: {}", e);
                self.failed += 1;
            }
        }
    }
}

/// Requests a running engine to stop reading input.
///
/// Safe to call from a signal handler thread.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn request(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_requested(&self) -> bool {
        *self.tx.borrow()
    }
}

/// The dispatch engine
pub struct Engine {
    config: SessionConfig,
    options: EngineOptions,
    sink: Arc<dyn NoteSink>,
    state: EngineState,
    shutdown: Arc<watch::Sender<bool>>,
}

impl Engine {
    /// Create an engine writing to an already open sink
    pub fn new(config: SessionConfig, options: EngineOptions, sink: Arc<dyn NoteSink>) -> Self {
        let (shutdown, _) = watch::channel(false);

        Self {
            config,
            options,
            sink,
            state: EngineState::Idle,
            shutdown: Arc::new(shutdown),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Handle for stopping the engine from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: Arc::clone(&self.shutdown),
        }
    }

    /// Run until the source ends or shutdown is requested.
    ///
    /// Every event is handed to its own task without waiting for earlier
    /// ones; at most `options.workers` tasks translate at once. Returns
    /// only after every submitted task has finished, so no note-on is
    /// left without its note-off. An engine runs once.
    pub async fn run<E: EventSource + 'static>(&mut self, source: E) -> Result<DispatchReport> {
        if self.state != EngineState::Idle {
            return Err(BridgeError::EngineStopped);
        }

        let source_name = source.name().to_string();
        let (event_tx, mut event_rx) = mpsc::channel(EVENT_QUEUE);
        let reader = spawn_reader(source, event_tx)?;
        let mut shutdown = self.shutdown.subscribe();

        self.state = EngineState::Running;
        info!(
            "Reading {} (channel {}, transpose {:+})",
            source_name,
            self.config.display_channel(),
            self.config.transpose
        );

        let permits = Arc::new(Semaphore::new(self.options.workers));
        let mut tasks = JoinSet::new();
        let mut report = DispatchReport::default();

        loop {
            while let Some(result) = tasks.try_join_next() {
                report.record(result);
            }

            tokio::select! {
                biased;

                _ = shutdown.wait_for(|stop| *stop) => {
                    info!("Shutdown requested, no longer reading {}", source_name);
                    break;
                }

                next = event_rx.recv() => match next {
                    Some(Ok(event)) => {
                        report.received += 1;
                        self.submit(&mut tasks, &permits, event);
                        report.dispatched += 1;
                    }
                    Some(Err(e)) => {
                        error!("Reading {} failed: {}", source_name, e);
                        report.input_error = Some(e.to_string());
                        break;
                    }
                    None => {
                        info!("Input stream {} ended", source_name);
                        break;
                    }
                },
            }
        }

        self.state = EngineState::Draining;
        drop(event_rx);
        debug!("Draining {} in-flight translations", tasks.len());

        while let Some(result) = tasks.join_next().await {
            report.record(result);
        }

        if reader.is_finished() {
            let _ = reader.join();
        } else {
            // Still blocked on the device; it exits on its next read.
            debug!("Reader for {} detached", source_name);
        }

        self.state = EngineState::Stopped;
        Ok(report)
    }

    fn submit(
        &self,
        tasks: &mut JoinSet<Result<Outcome>>,
        permits: &Arc<Semaphore>,
        event: InputEvent,
    ) {
        let sink = Arc::clone(&self.sink);
        let permits = Arc::clone(permits);
        let config = self.config;
        let hold = self.options.hold;

        tasks.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| BridgeError::EngineStopped)?;
            translate_and_play(event, config, sink.as_ref(), hold).await
        });
    }
}

/// Pull events from `source` on a dedicated thread until it ends or the
/// dispatcher hangs up. The source is dropped on that thread, which
/// releases any device it holds.
fn spawn_reader<E: EventSource + 'static>(
    mut source: E,
    tx: mpsc::Sender<Result<InputEvent>>,
) -> Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("drum2midi-reader".to_string())
        .spawn(move || {
            loop {
                match source.next_event() {
                    Ok(Some(event)) => {
                        if tx.blocking_send(Ok(event)).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        let _ = tx.blocking_send(Err(e));
                        break;
                    }
                }
            }
            debug!("Reader for {} stopped", source.name());
        })?;

    Ok(handle)
}
