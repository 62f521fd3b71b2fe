use async_trait::async_trait;
use serde_json::{Map, Value};

use relaywire_core::error::{RelayError, Result};
use relaywire_core::protocol::{MessageReader, Symbol};

use crate::actions::ProxyAction;
use crate::dispatch::ActionHandler;
use crate::relay::RelayCtx;

/// Which servers a relayed action reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fanout {
    /// Every server, the origin included.
    All,
    /// Every server but the origin.
    Others,
}

/// Validates the action's fields, then relays the original bytes.
pub struct FanoutService {
    action: ProxyAction,
    fanout: Fanout,
}

impl FanoutService {
    pub fn new(action: ProxyAction, fanout: Fanout) -> Self {
        Self { action, fanout }
    }

    /// Consume every declared field so malformed messages are not relayed.
    fn validate(&self, msg: &mut MessageReader<ProxyAction>) -> Result<()> {
        match self.action {
            ProxyAction::Broadcast => {
                let text = msg.read_string()?;
                tracing::debug!(len = text.len(), "broadcast");
            }
            ProxyAction::ChatMessage => {
                let channel = msg.read_string()?;
                let sender = msg.read_string()?;
                let _message = msg.read_string()?;
                tracing::debug!(%channel, %sender, "chat message");
            }
            ProxyAction::DataSync => {
                let data: Map<String, Value> = msg.read_map()?;
                tracing::debug!(keys = data.len(), "data sync");
            }
            other => {
                return Err(RelayError::Internal(format!(
                    "{} is not a fan-out action",
                    other.name()
                )))
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ActionHandler for FanoutService {
    fn action(&self) -> ProxyAction {
        self.action
    }

    async fn handle(&self, ctx: RelayCtx, mut msg: MessageReader<ProxyAction>) -> Result<()> {
        self.validate(&mut msg)?;

        let report = match self.fanout {
            Fanout::All => ctx.forward_to_all(&msg),
            Fanout::Others => ctx.forward_to_others(&msg),
        };
        tracing::debug!(
            action = self.action.name(),
            origin = msg.origin_server(),
            sent = report.sent.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "relayed"
        );
        Ok(())
    }
}
