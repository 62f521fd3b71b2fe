use async_trait::async_trait;

use relaywire_core::error::Result;
use relaywire_core::protocol::MessageReader;

use crate::actions::ProxyAction;
use crate::dispatch::ActionHandler;
use crate::relay::{Delivery, RelayCtx};

/// Tells the target server a player is on the way.
#[derive(Default)]
pub struct JoinServerService;

impl JoinServerService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionHandler for JoinServerService {
    fn action(&self) -> ProxyAction {
        ProxyAction::JoinServer
    }

    async fn handle(&self, ctx: RelayCtx, mut msg: MessageReader<ProxyAction>) -> Result<()> {
        let player = msg.read_uuid()?;
        let target = msg.read_string()?;

        let peer = ctx.resolve_peer(&target)?;
        let delivery = ctx.forward_to_peer(&msg, &peer)?;
        tracing::debug!(%player, %target, ?delivery, "join announced");
        Ok(())
    }
}

/// Relays an opaque payload to one named server.
#[derive(Default)]
pub struct SendToServerService;

impl SendToServerService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionHandler for SendToServerService {
    fn action(&self) -> ProxyAction {
        ProxyAction::SendToServer
    }

    async fn handle(&self, ctx: RelayCtx, mut msg: MessageReader<ProxyAction>) -> Result<()> {
        let target = msg.read_string()?;
        let payload = msg.read_tail()?;

        let peer = ctx.resolve_peer(&target)?;
        if ctx.forward_to_peer(&msg, &peer)? == Delivery::Failed {
            tracing::warn!(%target, len = payload.len(), "payload not delivered");
        }
        Ok(())
    }
}
