//! WebSocket handler for backend links.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS for `/v1/backend?server=<name>`
//! - Register the link in the server directory (replacing a stale one)
//! - Lifecycle: ping/pong + idle timeout
//! - Decode-once: strip channel framing, drop foreign channels, parse the
//!   message, hand it to the dispatcher
//!
//! A message that fails to decode or dispatch is logged and dropped; the link
//! keeps serving the next one.

use std::sync::Arc;

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, Query, State},
    response::Response,
};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use relaywire_core::error::{RelayError, Result};
use relaywire_core::protocol::{MessageReader, Symbol, CHANNEL};

use crate::app_state::AppState;
use crate::relay::{BackendLink, Destination, RelayCtx};
use crate::transport::codec::{decode, split_channel, Inbound};

#[derive(Debug, Deserialize)]
pub struct BackendQuery {
    pub server: String,
}

pub async fn backend_upgrade(
    State(app): State<AppState>,
    ws: WebSocketUpgrade,
    Query(q): Query<BackendQuery>,
) -> Response {
    let max = app.cfg().gateway.max_frame_bytes;
    ws.max_message_size(max).on_upgrade(move |socket| async move {
        let server = q.server.clone();
        if let Err(e) = run_link(app, q, socket).await {
            tracing::warn!(%server, error = %e, "backend link ended with error");
        }
    })
}

/// Parse one channel payload and run its action handler.
pub async fn handle_payload(app: &AppState, link: &Arc<BackendLink>, payload: Bytes) -> Result<()> {
    let msg = MessageReader::parse_cached(payload, app.symbols())?;
    tracing::trace!(
        sender = %msg.sender_id(),
        origin = msg.origin_server(),
        action = msg.action().name(),
        "message received"
    );
    let ctx = RelayCtx::new(Arc::clone(link), app.directory(), app.forwarder());
    app.dispatcher().dispatch(ctx, msg).await
}

/// Route one binary frame: frames on other channels are dropped before the
/// protocol sees them. Returns whether the frame was dispatched.
pub async fn handle_frame(app: &AppState, link: &Arc<BackendLink>, frame: Bytes) -> Result<bool> {
    let (channel, payload) = split_channel(frame)?;
    if channel != CHANNEL {
        tracing::trace!(server = link.name(), %channel, "ignoring foreign channel");
        return Ok(false);
    }
    handle_payload(app, link, payload).await?;
    Ok(true)
}

async fn run_link(app: AppState, q: BackendQuery, socket: WebSocket) -> Result<()> {
    if !app.cfg().allows_server(&q.server) {
        return Err(RelayError::Config(format!(
            "server '{}' is not configured",
            q.server
        )));
    }

    // ---- outbound channel
    let gw = &app.cfg().gateway;
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(gw.outbound_queue);

    // ---- register
    let link = Arc::new(BackendLink::new(q.server.clone(), app.next_conn_id(), out_tx.clone()));
    if let Some(prev) = app.directory().insert(Arc::clone(&link)) {
        tracing::warn!(server = %q.server, "backend reconnected, closing previous link");
        prev.close();
    }
    tracing::info!(server = %q.server, conn_id = link.conn_id(), "backend connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    // ---- timers
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        let closing = matches!(m, Message::Close(_));
                        if ws_tx.send(m).await.is_err() || closing {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // replaced by a newer connection under the same name
            _ = link.closed() => {
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else { break; };

                last_activity = Instant::now();

                if let Message::Binary(frame) = msg {
                    if let Err(e) = handle_frame(&app, &link, Bytes::from(frame)).await {
                        tracing::warn!(
                            server = %q.server,
                            code = e.code().as_str(),
                            error = %e,
                            "message dropped"
                        );
                    }
                    continue;
                }

                match decode(msg) {
                    Ok(Inbound::Channel { .. }) => {}
                    Ok(Inbound::Text(len)) => {
                        tracing::warn!(server = %q.server, len, "text frame ignored");
                    }
                    Ok(Inbound::Ping(payload)) => {
                        let _ = out_tx.try_send(Message::Pong(payload));
                    }
                    Ok(Inbound::Pong(_)) => {}
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        tracing::warn!(server = %q.server, error = %e, "undecodable frame");
                    }
                }
            }

            // ping
            _ = ping_tick.tick() => {
                let _ = out_tx.try_send(Message::Ping(Vec::new()));
            }

            // idle timeout
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    tracing::info!(server = %q.server, "backend idle timeout");
                    break;
                }
            }
        }
    }

    app.directory().remove(&q.server, link.conn_id());
    tracing::info!(server = %q.server, conn_id = link.conn_id(), "backend disconnected");
    Ok(())
}
