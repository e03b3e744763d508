//! OSC encoding and TCP transport for the bridge's sending side.
//!
//! The dispatch core hands [`DispatchOutcome`](midi2osc_core::DispatchOutcome)s
//! over a bounded queue; [`run_sender`] drains them and transmits each
//! action as an OSC 1.0 message over TCP.

pub mod error;
pub use error::{Error, Result};

pub mod message;
pub use message::encode_message;

pub mod client;
pub use client::OscClient;

pub mod worker;
pub use worker::{run_sender, OscSender};
