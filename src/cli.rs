use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(name = "midi2osc")]
#[command(about = "Bridge MIDI control-change events to OSC messages")]
pub struct Cli {
    /// Path to the YAML mapping file. Uses the built-in mapping when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// MIDI input device to open, by index or case-insensitive name substring.
    /// Defaults to the first available device.
    #[arg(long)]
    pub device: Option<String>,

    /// List available MIDI input devices and exit.
    #[arg(long)]
    pub list_devices: bool,
}
