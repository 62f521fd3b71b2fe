//! Transport layer (WebSocket backend links).
//!
//! Exposes the WS upgrade handler for backends and the codec that strips
//! channel framing before messages reach the dispatcher.

pub mod codec;
pub mod ws;
