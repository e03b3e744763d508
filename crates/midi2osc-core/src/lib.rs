//! Dispatch core for the MIDI-to-OSC bridge.
//!
//! Config snapshot, rule matching, the bounded handoff queue, and the
//! realtime-side bridge aggregate. No hardware or network dependencies;
//! the binary crate wires this to a MIDI driver and an OSC transport.

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{ConfigSnapshot, OscAction, OscAddress, OscValue, Rule, Scheme};

pub mod event;
pub use event::{RawMidiEvent, CONTROL_CHANGE};

pub mod dispatch;
pub use dispatch::DispatchOutcome;

pub mod queue;
pub use queue::{
    bounded_queue, DropCounter, EnqueueOutcome, QueueConsumer, QueueProducer, DEFAULT_CAPACITY,
};

pub mod bridge;
pub use bridge::{Bridge, MidiBlockHandler};
