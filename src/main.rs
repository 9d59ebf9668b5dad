//! drum2midi - Drum controller to MIDI bridge

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use drum2midi::engine::{list_midi_ports, MidirSink};
use drum2midi::error::exit;
use drum2midi::{BridgeError, Engine, EngineOptions, SessionConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.session_config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(&config))),
        )
        .init();

    match run(cli, config) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<BridgeError>()
                .map(BridgeError::exit_code)
                .unwrap_or(exit::USAGE);
            ExitCode::from(code)
        }
    }
}

/// Log filter used when `RUST_LOG` is unset; verbose shows every message sent.
fn default_filter(config: &SessionConfig) -> &'static str {
    if config.verbose {
        "info,drum2midi=debug"
    } else {
        "info"
    }
}

fn run(cli: Cli, config: SessionConfig) -> Result<ExitCode> {
    if cli.list {
        list_ports_and_devices();
        return Ok(ExitCode::SUCCESS);
    }

    let Some(device) = cli.device.clone() else {
        Cli::command().print_help()?;
        return Ok(ExitCode::from(exit::USAGE));
    };

    let sink = Arc::new(open_sink(&cli)?);
    let source = open_source(&device, cli.grab)
        .with_context(|| format!("opening input device {}", device.display()))?;

    let port_name = sink.port_name().to_string();
    let mut engine = Engine::new(config, EngineOptions::default(), sink.clone());

    let shutdown = engine.shutdown_handle();
    ctrlc::set_handler(move || shutdown.request()).context("installing interrupt handler")?;

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(engine.run(source))?;

    info!(
        "Stopped after {} events: {} played, {} ignored, {} failed on \"{}\"",
        report.received, report.played, report.ignored, report.failed, port_name
    );

    drop(engine);
    if let Ok(sink) = Arc::try_unwrap(sink) {
        sink.close();
    }

    if let Some(reason) = report.input_error {
        warn!("Input ended with an error: {}", reason);
        return Ok(ExitCode::from(exit::DEVICE));
    }

    Ok(ExitCode::SUCCESS)
}

fn open_sink(cli: &Cli) -> Result<MidirSink, BridgeError> {
    match &cli.connect_port {
        Some(prefix) => MidirSink::connect(prefix),
        None => open_virtual(&cli.port_name),
    }
}

#[cfg(unix)]
fn open_virtual(port_name: &str) -> Result<MidirSink, BridgeError> {
    MidirSink::open_virtual(port_name)
}

#[cfg(not(unix))]
fn open_virtual(_port_name: &str) -> Result<MidirSink, BridgeError> {
    Err(BridgeError::MidiOutput(
        "virtual ports are not supported on this platform, use --connect".to_string(),
    ))
}

#[cfg(target_os = "linux")]
fn open_source(
    device: &std::path::Path,
    grab: bool,
) -> Result<drum2midi::sources::EvdevSource, BridgeError> {
    drum2midi::sources::EvdevSource::open(device, grab)
}

#[cfg(not(target_os = "linux"))]
fn open_source(
    _device: &std::path::Path,
    _grab: bool,
) -> Result<drum2midi::sources::ReplaySource, BridgeError> {
    Err(BridgeError::Device(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "evdev input devices are only available on Linux",
    )))
}

fn list_ports_and_devices() {
    println!("MIDI output ports:");
    match list_midi_ports() {
        Ok(ports) => {
            for port in ports {
                println!("    {}", port);
            }
        }
        Err(e) => println!("    Error listing ports: {}", e),
    }

    println!("Devices:");
    #[cfg(target_os = "linux")]
    for device in drum2midi::sources::list_input_devices() {
        println!("    {} {}", device.path.display(), device.name);
    }
}
