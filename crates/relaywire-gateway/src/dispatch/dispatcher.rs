use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use relaywire_core::error::{RelayError, Result};
use relaywire_core::protocol::{MessageReader, Symbol};

use crate::actions::ProxyAction;
use crate::relay::RelayCtx;

/// Handles every message carrying one action.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn action(&self) -> ProxyAction;
    async fn handle(&self, ctx: RelayCtx, msg: MessageReader<ProxyAction>) -> Result<()>;
}

/// Registry and dispatcher for action handlers.
#[derive(Default)]
pub struct Dispatcher {
    handlers: DashMap<ProxyAction, Arc<dyn ActionHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(handler.action(), handler);
    }

    pub fn registered_actions(&self) -> Vec<ProxyAction> {
        self.handlers.iter().map(|e| *e.key()).collect()
    }

    pub async fn dispatch(&self, ctx: RelayCtx, msg: MessageReader<ProxyAction>) -> Result<()> {
        let action = msg.action();
        let handler = self
            .handlers
            .get(&action)
            .ok_or_else(|| RelayError::Internal(format!("no handler for action {}", action.name())))?
            .value()
            .clone();
        handler.handle(ctx, msg).await
    }
}
