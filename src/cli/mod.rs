//! CLI interface for drum2midi

use clap::Parser;
use drum2midi::config::{self, SessionConfig};
use std::path::PathBuf;

/// Translate drum controller pad strikes into MIDI notes
#[derive(Parser, Debug)]
#[command(name = "drum2midi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Evdev input device (e.g. /dev/input/event5)
    pub device: Option<PathBuf>,

    /// List MIDI output ports, input devices and quit
    #[arg(short, long)]
    pub list: bool,

    /// MIDI output port name to create
    #[arg(short = 'n', long, default_value = "Drum2Midi")]
    pub port_name: String,

    /// MIDI input port to connect to (matched by name prefix)
    #[arg(short = 'o', long = "connect")]
    pub connect_port: Option<String>,

    /// MIDI channel number (1-16)
    #[arg(short, long, default_value = "10", value_parser = channel_arg)]
    pub channel: u8,

    /// Transpose MIDI notes by amount (+/- 0-126)
    #[arg(short, long, default_value = "0", value_parser = transpose_arg, allow_hyphen_values = true)]
    pub transpose: i8,

    /// Grab input device, swallow input events
    #[arg(short, long)]
    pub grab: bool,

    /// Print MIDI messages
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Session settings for the dispatch engine
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            channel: self.channel,
            transpose: self.transpose,
            verbose: self.verbose,
        }
    }
}

fn channel_arg(value: &str) -> Result<u8, String> {
    config::parse_channel(value).map_err(|e| e.to_string())
}

fn transpose_arg(value: &str) -> Result<i8, String> {
    config::parse_transpose(value).map_err(|e| e.to_string())
}
