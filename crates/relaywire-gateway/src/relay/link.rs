use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::ws::Message;
use bytes::Bytes;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Notify;
use uuid::Uuid;

use relaywire_core::error::{RelayError, Result};

use crate::transport::codec;

/// A server the proxy can relay channel messages to.
pub trait Destination: Send + Sync {
    fn name(&self) -> &str;
    /// Sessions currently on the server.
    fn occupancy(&self) -> usize;
    /// Queue `payload` for delivery on `channel`. Never blocks.
    fn send(&self, channel: &str, payload: Bytes) -> Result<()>;
}

/// A resolved forward target.
#[derive(Clone)]
pub enum Peer {
    Server(Arc<dyn Destination>),
    /// Player sessions are not channel endpoints.
    Player(Uuid),
}

impl std::fmt::Debug for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Peer::Server(d) => f.debug_tuple("Server").field(&d.name()).finish(),
            Peer::Player(id) => f.debug_tuple("Player").field(id).finish(),
        }
    }
}

/// One connected backend: its outbound queue and last reported occupancy.
pub struct BackendLink {
    name: String,
    conn_id: u64,
    occupancy: AtomicUsize,
    tx: mpsc::Sender<Message>,
    shutdown: Notify,
}

impl BackendLink {
    pub fn new(name: impl Into<String>, conn_id: u64, tx: mpsc::Sender<Message>) -> Self {
        Self {
            name: name.into(),
            conn_id,
            occupancy: AtomicUsize::new(0),
            tx,
            shutdown: Notify::new(),
        }
    }

    /// Identifies this connection among reconnects under the same name.
    pub fn conn_id(&self) -> u64 {
        self.conn_id
    }

    pub fn set_occupancy(&self, n: usize) {
        self.occupancy.store(n, Ordering::Relaxed);
    }

    /// Ask the session loop to close the socket.
    ///
    /// The shutdown signal is kept until the loop observes it, so a full
    /// outbound queue cannot swallow the request.
    pub fn close(&self) {
        self.shutdown.notify_one();
        tracing::debug!(server = %self.name, conn_id = self.conn_id, "link close requested");
    }

    /// Resolves once `close` has been called.
    pub async fn closed(&self) {
        self.shutdown.notified().await;
    }
}

impl Destination for BackendLink {
    fn name(&self) -> &str {
        &self.name
    }

    fn occupancy(&self) -> usize {
        self.occupancy.load(Ordering::Relaxed)
    }

    fn send(&self, channel: &str, payload: Bytes) -> Result<()> {
        let frame = codec::encode_channel(channel, &payload)?;
        self.tx
            .try_send(Message::Binary(frame))
            .map_err(|e| match e {
                TrySendError::Closed(_) => RelayError::Disconnected(self.name.clone()),
                TrySendError::Full(_) => {
                    RelayError::Internal(format!("outbound queue full for {}", self.name))
                }
            })
    }
}
