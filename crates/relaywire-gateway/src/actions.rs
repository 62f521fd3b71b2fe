//! Action set spoken between the proxy and its backends.
//!
//! Backends built from older releases may send these tags with different
//! casing or punctuation; resolution goes through the lenient symbol chain.

use relaywire_core::protocol::{Action, FieldKind, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyAction {
    /// `[message]`, relayed to every occupied server.
    Broadcast,
    /// `[channel, sender_name, message]`, relayed to every other server.
    ChatMessage,
    /// `[data]`, relayed to every other server.
    DataSync,
    /// `[count]`, the origin's current occupancy. Consumed by the proxy.
    PlayerCount,
    /// `[player, target]`, announces an incoming player to the target server.
    JoinServer,
    /// `[target, payload...]`, relayed to one named server.
    SendToServer,
}

impl Symbol for ProxyAction {
    const KIND: &'static str = "action";

    fn variants() -> &'static [Self] {
        &[
            ProxyAction::Broadcast,
            ProxyAction::ChatMessage,
            ProxyAction::DataSync,
            ProxyAction::PlayerCount,
            ProxyAction::JoinServer,
            ProxyAction::SendToServer,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            ProxyAction::Broadcast => "BROADCAST",
            ProxyAction::ChatMessage => "CHAT_MESSAGE",
            ProxyAction::DataSync => "DATA_SYNC",
            ProxyAction::PlayerCount => "PLAYER_COUNT",
            ProxyAction::JoinServer => "JOIN_SERVER",
            ProxyAction::SendToServer => "SEND_TO_SERVER",
        }
    }

    fn alias(key: &str) -> Option<Self> {
        // pre-1.0 backends
        match key {
            "CHAT" => Some(ProxyAction::ChatMessage),
            "FORWARD" => Some(ProxyAction::SendToServer),
            _ => None,
        }
    }
}

impl Action for ProxyAction {
    fn schema(self) -> &'static [FieldKind] {
        match self {
            ProxyAction::Broadcast => &[FieldKind::String],
            ProxyAction::ChatMessage => &[FieldKind::String, FieldKind::String, FieldKind::String],
            ProxyAction::DataSync => &[FieldKind::Map],
            ProxyAction::PlayerCount => &[FieldKind::I32],
            ProxyAction::JoinServer => &[FieldKind::Uuid, FieldKind::String],
            ProxyAction::SendToServer => &[FieldKind::String, FieldKind::Tail],
        }
    }
}
