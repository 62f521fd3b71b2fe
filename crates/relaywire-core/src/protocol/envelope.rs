//! Message envelope: the three leading fields of every message.

use uuid::Uuid;

use crate::error::{RelayError, Result};
use crate::protocol::cursor::{ByteReader, ByteWriter};
use crate::protocol::schema::Action;

/// Sender identity, origin server and action, always first and in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<A> {
    /// Session the message originates from.
    pub sender_id: Uuid,
    /// Name of the server that produced the message.
    pub origin_server: String,
    /// Selects the field schema that follows.
    pub action: A,
}

impl<A: Action> Envelope<A> {
    pub fn new(sender_id: Uuid, origin_server: impl Into<String>, action: A) -> Self {
        Self {
            sender_id,
            origin_server: origin_server.into(),
            action,
        }
    }

    pub(crate) fn write(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_string(&self.sender_id.hyphenated().to_string())?;
        w.write_string(&self.origin_server)?;
        w.write_string(self.action.name())
    }

    /// Consume exactly three strings and resolve the action with `resolve`.
    pub(crate) fn read<F>(r: &mut ByteReader, resolve: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<A>,
    {
        let sender_id = parse_uuid(&r.read_string()?)?;
        let origin_server = r.read_string()?;
        let action = resolve(&r.read_string()?)?;
        Ok(Self {
            sender_id,
            origin_server,
            action,
        })
    }
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| RelayError::Encoding(format!("invalid uuid '{s}': {e}")))
}
