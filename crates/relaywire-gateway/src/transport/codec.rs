//! Decode-once codec for backend links.
//!
//! A binary WS message carries one channel frame:
//!
//! ```text
//! [string channel][message bytes...]
//! ```
//!
//! The channel string uses the same length-prefixed encoding as message
//! fields. Ping/Pong/Close are surfaced for lifecycle management.

use axum::extract::ws::Message;
use bytes::Bytes;

use relaywire_core::error::Result;
use relaywire_core::protocol::cursor::{ByteReader, ByteWriter};

#[derive(Debug)]
pub enum Inbound {
    Channel { channel: String, payload: Bytes },
    /// Text frames are not part of the link protocol.
    Text(usize),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Binary(b) => {
            let (channel, payload) = split_channel(Bytes::from(b))?;
            Ok(Inbound::Channel { channel, payload })
        }
        Message::Text(s) => Ok(Inbound::Text(s.len())),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(v) => Ok(Inbound::Pong(v)),
        Message::Close(_) => Ok(Inbound::Close),
    }
}

/// Split a binary frame into its channel name and message bytes.
pub fn split_channel(frame: Bytes) -> Result<(String, Bytes)> {
    let mut r = ByteReader::new(frame);
    let channel = r.read_string()?;
    Ok((channel, r.read_remaining_bytes()))
}

/// Frame `payload` for `channel`.
pub fn encode_channel(channel: &str, payload: &[u8]) -> Result<Vec<u8>> {
    let mut w = ByteWriter::with_capacity(2 + channel.len() + payload.len());
    w.write_string(channel)?;
    w.write_bytes(payload);
    Ok(w.finish().to_vec())
}
