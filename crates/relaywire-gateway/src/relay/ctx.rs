use std::sync::Arc;

use uuid::Uuid;

use relaywire_core::error::{RelayError, Result};
use relaywire_core::protocol::MessageReader;

use crate::actions::ProxyAction;
use crate::relay::directory::{Directory, ServerDirectory};
use crate::relay::forward::{Delivery, ForwardReport, Forwarder};
use crate::relay::link::{BackendLink, Destination, Peer};

/// Per-message context passed to action handlers.
#[derive(Clone)]
pub struct RelayCtx {
    link: Arc<BackendLink>,
    directory: Arc<ServerDirectory>,
    forwarder: Forwarder,
}

impl RelayCtx {
    pub fn new(link: Arc<BackendLink>, directory: Arc<ServerDirectory>, forwarder: Forwarder) -> Self {
        Self {
            link,
            directory,
            forwarder,
        }
    }

    /// Name the receiving connection registered under.
    pub fn server(&self) -> &str {
        self.link.name()
    }

    pub fn link(&self) -> &BackendLink {
        &self.link
    }

    pub fn directory(&self) -> &ServerDirectory {
        &self.directory
    }

    /// Server name, then player UUID; anything else cannot be routed.
    pub fn resolve_peer(&self, target: &str) -> Result<Peer> {
        if let Some(dest) = self.directory.get(target) {
            return Ok(Peer::Server(dest));
        }
        if let Ok(id) = Uuid::parse_str(target) {
            return Ok(Peer::Player(id));
        }
        Err(RelayError::UnsupportedDestination(format!(
            "no routable connection named '{target}'"
        )))
    }

    pub fn forward_to_all(&self, msg: &MessageReader<ProxyAction>) -> ForwardReport {
        self.forwarder.forward_to_all(msg, &*self.directory)
    }

    pub fn forward_to_others(&self, msg: &MessageReader<ProxyAction>) -> ForwardReport {
        self.forwarder.forward_to_others(msg, &*self.directory)
    }

    pub fn forward_to_peer(&self, msg: &MessageReader<ProxyAction>, peer: &Peer) -> Result<Delivery> {
        self.forwarder.forward_to_peer(msg, peer)
    }
}
