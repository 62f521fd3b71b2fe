//! Message reader: decodes the envelope up front, then hands out fields in
//! the action's declared order.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::cache::SymbolCache;
use crate::error::{RelayError, Result};
use crate::protocol::cursor::ByteReader;
use crate::protocol::envelope::{parse_uuid, Envelope};
use crate::protocol::schema::{Action, FieldKind, SchemaCursor};
use crate::protocol::symbol::{self, Symbol};

/// One received message.
///
/// Keeps the exact received bytes so the message can be forwarded without
/// re-encoding.
#[derive(Debug, Clone)]
pub struct MessageReader<A> {
    raw: Bytes,
    envelope: Envelope<A>,
    input: ByteReader,
    schema: SchemaCursor,
}

impl<A: Action> MessageReader<A> {
    /// Decode the envelope, resolving the action leniently.
    pub fn parse(raw: Bytes) -> Result<Self> {
        Self::parse_with(raw, symbol::resolve::<A>)
    }

    /// Decode the envelope, resolving the action through a shared cache.
    pub fn parse_cached(raw: Bytes, cache: &SymbolCache<A>) -> Result<Self> {
        Self::parse_with(raw, |s| cache.resolve(s))
    }

    fn parse_with<F>(raw: Bytes, resolve: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<A>,
    {
        let mut input = ByteReader::new(raw.clone());
        let envelope = Envelope::read(&mut input, resolve)?;
        let schema = SchemaCursor::new(envelope.action)?;
        Ok(Self {
            raw,
            envelope,
            input,
            schema,
        })
    }

    pub fn envelope(&self) -> &Envelope<A> {
        &self.envelope
    }

    pub fn sender_id(&self) -> Uuid {
        self.envelope.sender_id
    }

    pub fn origin_server(&self) -> &str {
        &self.envelope.origin_server
    }

    pub fn action(&self) -> A {
        self.envelope.action
    }

    /// The message exactly as received.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Kind of the last field read, if any.
    pub fn last_read(&self) -> Option<FieldKind> {
        self.schema.last()
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.remaining()
    }

    pub fn read_string(&mut self) -> Result<String> {
        self.schema.advance(FieldKind::String)?;
        self.input.read_string()
    }

    pub fn read_uuid(&mut self) -> Result<Uuid> {
        self.schema.advance(FieldKind::Uuid)?;
        parse_uuid(&self.input.read_string()?)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.schema.advance(FieldKind::Bool)?;
        self.input.read_bool()
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.schema.advance(FieldKind::I8)?;
        self.input.read_i8()
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.schema.advance(FieldKind::I16)?;
        self.input.read_i16()
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.schema.advance(FieldKind::I32)?;
        self.input.read_i32()
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.schema.advance(FieldKind::I64)?;
        self.input.read_i64()
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.schema.advance(FieldKind::F32)?;
        self.input.read_f32()
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.schema.advance(FieldKind::F64)?;
        self.input.read_f64()
    }

    /// JSON object text decoded into `T`.
    pub fn read_map<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.schema.advance(FieldKind::Map)?;
        let text = self.input.read_string()?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| RelayError::Encoding(format!("invalid map field: {e}")))?;
        if !value.is_object() {
            return Err(RelayError::Encoding("map field must be a JSON object".into()));
        }
        serde_json::from_value(value)
            .map_err(|e| RelayError::Encoding(format!("invalid map field: {e}")))
    }

    /// Closed-set field resolved through the lenient fallback chain.
    pub fn read_symbol<S: Symbol>(&mut self) -> Result<S> {
        self.schema.advance(FieldKind::Symbol)?;
        symbol::resolve(&self.input.read_string()?)
    }

    /// Everything left in the message.
    pub fn read_tail(&mut self) -> Result<Bytes> {
        self.schema.advance(FieldKind::Tail)?;
        Ok(self.input.read_remaining_bytes())
    }
}
