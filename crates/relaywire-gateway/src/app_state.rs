//! Shared application state for the relaywire gateway.
//!
//! Wires the backend directory, dispatcher and symbol cache, and registers
//! the built-in action handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use relaywire_core::cache::SymbolCache;
use relaywire_core::error::Result;
use relaywire_core::protocol::Symbol;

use crate::actions::ProxyAction;
use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::relay::{Forwarder, ServerDirectory};
use crate::services::{
    Fanout, FanoutService, JoinServerService, PlayerCountService, SendToServerService,
};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    directory: Arc<ServerDirectory>,
    dispatcher: Arc<Dispatcher>,
    symbols: Arc<SymbolCache<ProxyAction>>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    conn_seq: AtomicU64,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let dispatcher = Dispatcher::new();

        dispatcher.register(Arc::new(FanoutService::new(ProxyAction::Broadcast, Fanout::All)));
        dispatcher.register(Arc::new(FanoutService::new(ProxyAction::ChatMessage, Fanout::Others)));
        dispatcher.register(Arc::new(FanoutService::new(ProxyAction::DataSync, Fanout::Others)));
        dispatcher.register(Arc::new(PlayerCountService::new()));
        dispatcher.register(Arc::new(JoinServerService::new()));
        dispatcher.register(Arc::new(SendToServerService::new()));

        // action set <-> dispatcher sanity check
        let registered = dispatcher.registered_actions();
        for action in ProxyAction::variants() {
            if !registered.contains(action) {
                tracing::warn!(action = action.name(), "action has no registered handler");
            }
        }

        let symbols = Arc::new(SymbolCache::new(cfg.resolver.cache_capacity));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                conn_seq: AtomicU64::new(1),
            }),
            directory: Arc::new(ServerDirectory::new()),
            dispatcher: Arc::new(dispatcher),
            symbols,
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    /// Fresh id for a backend connection.
    pub fn next_conn_id(&self) -> u64 {
        self.inner.conn_seq.fetch_add(1, Ordering::Relaxed)
    }

    pub fn directory(&self) -> Arc<ServerDirectory> {
        Arc::clone(&self.directory)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn symbols(&self) -> &SymbolCache<ProxyAction> {
        &self.symbols
    }

    pub fn forwarder(&self) -> Forwarder {
        Forwarder::new()
    }
}
