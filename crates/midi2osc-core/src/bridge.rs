//! The bridge aggregate: realtime-side event handling.
//!
//! [`Bridge`] owns the config snapshot and the producer endpoints of the
//! handoff queues, and implements [`MidiBlockHandler`] for registration
//! with the device driver. Nothing on this path blocks, locks, allocates,
//! logs, or performs I/O.

use std::sync::Arc;

use crate::config::ConfigSnapshot;
use crate::dispatch::DispatchOutcome;
use crate::event::RawMidiEvent;
use crate::queue::QueueProducer;

/// Handler for one driver processing block of raw MIDI events.
///
/// The driver invokes this synchronously on its realtime thread with a
/// hard per-block deadline; implementations must not block.
pub trait MidiBlockHandler: Send {
    fn handle_block(&mut self, events: &[RawMidiEvent]);
}

/// Owns the snapshot, the outcome producer, and the optional diagnostics
/// producer. Constructed once and moved into the driver callback.
pub struct Bridge {
    config: Arc<ConfigSnapshot>,
    outcomes: QueueProducer<DispatchOutcome>,
    diagnostics: Option<QueueProducer<RawMidiEvent>>,
}

impl Bridge {
    pub fn new(config: Arc<ConfigSnapshot>, outcomes: QueueProducer<DispatchOutcome>) -> Self {
        Self {
            config,
            outcomes,
            diagnostics: None,
        }
    }

    /// Attach a raw-event side channel. Same drop-on-full policy as the
    /// outcome queue.
    pub fn with_diagnostics(mut self, diagnostics: QueueProducer<RawMidiEvent>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn config(&self) -> &ConfigSnapshot {
        &self.config
    }

    /// Outcomes lost to queue overflow since construction.
    pub fn dropped_outcomes(&self) -> u64 {
        self.outcomes.dropped_count()
    }
}

impl MidiBlockHandler for Bridge {
    fn handle_block(&mut self, events: &[RawMidiEvent]) {
        for event in events {
            if let Some(diagnostics) = &self.diagnostics {
                // Overflow here loses a debug line, nothing more
                let _ = diagnostics.try_enqueue(*event);
            }

            if let Some((controller, value)) = event.as_control_change() {
                for rule in self.config.matching_rules(controller, value) {
                    let _ = self.outcomes.try_enqueue(self.config.outcome_for(rule));
                }
            }
        }
    }
}
