//! Background sender: drains the outcome queue and transmits actions.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use midi2osc_core::{DispatchOutcome, OscAction, OscAddress, QueueConsumer};
use tracing::{info, warn};

use crate::client::OscClient;
use crate::error::Result;

/// Connection cache keyed by destination. Streams are established lazily;
/// a stream that fails a send is discarded, so the next outcome for that
/// destination gets a fresh connection attempt. The failed send itself is
/// never retried.
#[derive(Default)]
pub struct OscSender {
    connections: HashMap<OscAddress, OscClient>,
}

impl OscSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect eagerly, for the startup preflight where an unreachable
    /// destination is fatal.
    pub fn preconnect(&mut self, addr: &OscAddress) -> Result<()> {
        let client = OscClient::connect(addr)?;
        self.connections.insert(addr.clone(), client);
        Ok(())
    }

    /// Encode and transmit one action. Failures are returned, not retried.
    pub fn send_action(&mut self, destination: &OscAddress, action: &OscAction) -> Result<()> {
        let result = match self.client_for(destination) {
            Ok(client) => client.send(&action.path, &action.value),
            Err(e) => Err(e),
        };
        if result.is_err() {
            self.connections.remove(destination);
        }
        result
    }

    fn client_for(&mut self, destination: &OscAddress) -> Result<&mut OscClient> {
        match self.connections.entry(destination.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(OscClient::connect(destination)?)),
        }
    }
}

/// Consumer loop: blocks on the queue, sends each action in order, reports
/// each result independently. A failed action never aborts its siblings or
/// later outcomes. Returns once the queue is closed and drained.
pub fn run_sender(consumer: QueueConsumer<DispatchOutcome>, mut sender: OscSender) {
    while let Some(outcome) = consumer.recv() {
        for action in outcome.actions.iter() {
            match sender.send_action(&outcome.destination, action) {
                Ok(()) => info!("OSC sent: {} {:?}", action.path, action.value),
                Err(e) => warn!("OSC send failed for {}: {}", action.path, e),
            }
        }
    }
}
