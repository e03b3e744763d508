//! Pure rule matching and the outcome handed to the sender.

use std::sync::Arc;

use crate::config::{ConfigSnapshot, OscAction, OscAddress, Rule};

/// Resolved dispatch decision, queued for the background sender.
///
/// Carries `Arc` clones of snapshot data, so the sender can act after
/// dequeue without ever touching the snapshot again.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub destination: Arc<OscAddress>,
    pub actions: Arc<[OscAction]>,
}

impl Rule {
    /// Exact equality on both controller number and value. No wildcards,
    /// no ranges.
    #[inline]
    pub fn matches(&self, controller: u8, value: u8) -> bool {
        self.controller == controller && self.trigger_value == value
    }
}

impl ConfigSnapshot {
    /// All rules matching `(controller, value)`, in declaration order.
    /// Matching is not first-match-only: every matching rule fires.
    pub fn matching_rules(&self, controller: u8, value: u8) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(move |rule| rule.matches(controller, value))
    }

    /// Build the queue payload for a matched rule. `Arc` clones only; no
    /// heap allocation.
    #[inline]
    pub fn outcome_for(&self, rule: &Rule) -> DispatchOutcome {
        DispatchOutcome {
            destination: Arc::clone(&self.destination),
            actions: Arc::clone(&rule.actions),
        }
    }
}
