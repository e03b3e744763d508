//! Process wiring: config load, transport preflight, device connection,
//! worker threads, and shutdown ordering.

use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::bounded;
use midir::{MidiInput, MidiInputPort};
use tracing::{debug, info};

use midi2osc_core::{
    bounded_queue, Bridge, ConfigSnapshot, MidiBlockHandler, RawMidiEvent, DEFAULT_CAPACITY,
};
use midi2osc_osc::{run_sender, OscSender};

use crate::cli::Cli;

/// Compiled-in mapping used when no `--config` is given.
const DEFAULT_MAPPING: &str = include_str!("../resources/default_mapping.yaml");

pub fn list_devices() -> Result<()> {
    let midi_in = MidiInput::new("midi2osc-device-list").context("create MIDI input")?;
    let ports = midi_in.ports();

    println!("=== MIDI Input Devices ===");
    if ports.is_empty() {
        println!("  (none found)");
    }
    for (index, port) in ports.iter().enumerate() {
        let name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| format!("Unknown Device {}", index));
        println!("  [{}] {}", index, name);
    }
    Ok(())
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = Arc::new(load_config(cli)?);
    info!(
        "config loaded: {} rules, destination {}",
        config.rules.len(),
        config.destination
    );

    // Transport preflight: an unreachable destination is fatal before the
    // bridge starts.
    let mut sender = OscSender::new();
    sender
        .preconnect(&config.destination)
        .with_context(|| format!("connect to {}", config.destination))?;

    let (outcome_tx, outcome_rx) = bounded_queue(DEFAULT_CAPACITY);
    let (diag_tx, diag_rx) = bounded_queue(DEFAULT_CAPACITY);
    let outcome_drops = outcome_tx.drop_counter();

    let mut bridge = Bridge::new(Arc::clone(&config), outcome_tx).with_diagnostics(diag_tx);

    let sender_thread = thread::Builder::new()
        .name("osc-sender".to_string())
        .spawn(move || run_sender(outcome_rx, sender))?;
    let diag_thread = thread::Builder::new()
        .name("midi-debug".to_string())
        .spawn(move || {
            while let Some(event) = diag_rx.recv() {
                debug!("raw MIDI event: {:02X?}", &event.data[..event.len as usize]);
            }
        })?;

    // Register the callback last, once everything it feeds exists.
    let midi_in = MidiInput::new("midi2osc").context("create MIDI input")?;
    let port = select_port(&midi_in, cli.device.as_deref())?;
    let port_name = midi_in.port_name(&port).unwrap_or_else(|_| "?".into());
    let connection = midi_in
        .connect(
            &port,
            "midi2osc-in",
            move |_timestamp, bytes, _| {
                if let Some(event) = RawMidiEvent::from_bytes(bytes) {
                    bridge.handle_block(&[event]);
                }
            },
            (),
        )
        .map_err(|e| anyhow!("connect to MIDI device '{}': {}", port_name, e))?;
    info!("bridge active on '{}', Ctrl-C to stop", port_name);

    wait_for_interrupt()?;

    // Shutdown order matters: dropping the connection deregisters the
    // callback, which drops the bridge and its producer endpoints, closing
    // both queues. Only then do the workers drain and exit.
    info!("shutting down");
    drop(connection);
    if sender_thread.join().is_err() {
        bail!("sender thread panicked");
    }
    if diag_thread.join().is_err() {
        bail!("diagnostics thread panicked");
    }

    let dropped = outcome_drops.get();
    if dropped > 0 {
        info!("{} outcome(s) dropped under overload", dropped);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ConfigSnapshot> {
    match &cli.config {
        Some(path) => ConfigSnapshot::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None => {
            info!("no --config given, using built-in mapping");
            ConfigSnapshot::from_yaml(DEFAULT_MAPPING).context("parse built-in mapping")
        }
    }
}

/// Resolve `--device` to a port: a bare number selects by index, anything
/// else matches case-insensitively against port names. No selector picks
/// the first available port.
fn select_port(midi_in: &MidiInput, selector: Option<&str>) -> Result<MidiInputPort> {
    let ports = midi_in.ports();
    let selector = match selector {
        Some(s) => s,
        None => {
            return ports
                .first()
                .cloned()
                .ok_or_else(|| anyhow!("no MIDI input devices available"));
        }
    };

    if let Ok(index) = selector.parse::<usize>() {
        return ports
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("MIDI input device {} not found", index));
    }

    let needle = selector.to_lowercase();
    ports
        .iter()
        .find(|port| {
            midi_in
                .port_name(port)
                .map(|name| name.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .cloned()
        .ok_or_else(|| anyhow!("no MIDI input device matching '{}'", selector))
}

fn wait_for_interrupt() -> Result<()> {
    let (tx, rx) = bounded(1);
    ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    })
    .context("install signal handler")?;
    let _ = rx.recv();
    Ok(())
}
