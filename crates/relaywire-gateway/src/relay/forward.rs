//! Forwarding engine: re-emits a received message, byte for byte, to other
//! servers.
//!
//! Servers with no sessions are skipped; a send that fails because the server
//! went away between the snapshot and the send is logged and recorded, never
//! returned as an error.

use relaywire_core::error::{RelayError, Result};
use relaywire_core::protocol::{Action, MessageReader, Symbol, CHANNEL};

use crate::relay::directory::Directory;
use crate::relay::link::{Destination, Peer};

/// Outcome of forwarding to a single destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Zero occupancy, nothing sent.
    Skipped,
    /// Destination vanished or its queue was full.
    Failed,
}

/// Per-destination outcomes of a fan-out, in visit order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ForwardReport {
    pub sent: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

impl ForwardReport {
    fn record(&mut self, name: &str, d: Delivery) {
        let bucket = match d {
            Delivery::Sent => &mut self.sent,
            Delivery::Skipped => &mut self.skipped,
            Delivery::Failed => &mut self.failed,
        };
        bucket.push(name.to_string());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Forwarder {
    channel: &'static str,
}

impl Default for Forwarder {
    fn default() -> Self {
        Self::new()
    }
}

impl Forwarder {
    pub fn new() -> Self {
        Self { channel: CHANNEL }
    }

    pub fn channel(&self) -> &'static str {
        self.channel
    }

    /// Send the original bytes to `dest` unless it is empty.
    pub fn forward_to<A: Action>(&self, msg: &MessageReader<A>, dest: &dyn Destination) -> Delivery {
        let action = msg.action().name();

        if dest.occupancy() == 0 {
            tracing::debug!(
                channel = self.channel,
                action,
                server = dest.name(),
                "not forwarding: server is empty"
            );
            return Delivery::Skipped;
        }

        match dest.send(self.channel, msg.raw().clone()) {
            Ok(()) => {
                tracing::debug!(channel = self.channel, action, server = dest.name(), "forwarded");
                Delivery::Sent
            }
            Err(e) => {
                tracing::warn!(
                    channel = self.channel,
                    action,
                    server = dest.name(),
                    error = %e,
                    "forward failed"
                );
                Delivery::Failed
            }
        }
    }

    /// Every server in the directory, the origin included.
    pub fn forward_to_all<A: Action>(&self, msg: &MessageReader<A>, dir: &dyn Directory) -> ForwardReport {
        let mut report = ForwardReport::default();
        for dest in dir.list() {
            report.record(dest.name(), self.forward_to(msg, dest.as_ref()));
        }
        report
    }

    /// Every server except the one named as the message's origin.
    pub fn forward_to_others<A: Action>(&self, msg: &MessageReader<A>, dir: &dyn Directory) -> ForwardReport {
        let mut report = ForwardReport::default();
        for dest in dir.list() {
            if dest.name() == msg.origin_server() {
                continue;
            }
            report.record(dest.name(), self.forward_to(msg, dest.as_ref()));
        }
        report
    }

    /// Forward to a resolved peer; only server connections are routable.
    pub fn forward_to_peer<A: Action>(&self, msg: &MessageReader<A>, peer: &Peer) -> Result<Delivery> {
        match peer {
            Peer::Server(dest) => Ok(self.forward_to(msg, dest.as_ref())),
            Peer::Player(id) => Err(RelayError::UnsupportedDestination(format!(
                "player {id} is not a server connection"
            ))),
        }
    }
}
