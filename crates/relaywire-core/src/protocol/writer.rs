//! Message writer: envelope plus the action's ordered fields.

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{RelayError, Result};
use crate::protocol::cursor::ByteWriter;
use crate::protocol::envelope::Envelope;
use crate::protocol::schema::{Action, FieldKind, SchemaCursor};
use crate::protocol::symbol::Symbol;

/// Builds one outgoing message.
///
/// ```ignore
/// let mut w = MessageWriter::begin(sender, "lobby-1", ProxyAction::Broadcast)?;
/// w.put_string("hello")?;
/// let bytes = w.finish()?;
/// ```
#[derive(Debug)]
pub struct MessageWriter<A> {
    envelope: Envelope<A>,
    out: ByteWriter,
    schema: SchemaCursor,
}

impl<A: Action> MessageWriter<A> {
    /// Write the envelope; the writer is then positioned at the first field.
    pub fn begin(sender_id: Uuid, origin_server: impl Into<String>, action: A) -> Result<Self> {
        let schema = SchemaCursor::new(action)?;
        let envelope = Envelope::new(sender_id, origin_server, action);
        let mut out = ByteWriter::with_capacity(64);
        envelope.write(&mut out)?;
        Ok(Self {
            envelope,
            out,
            schema,
        })
    }

    pub fn envelope(&self) -> &Envelope<A> {
        &self.envelope
    }

    pub fn put_string(&mut self, v: &str) -> Result<&mut Self> {
        self.schema.advance(FieldKind::String)?;
        self.out.write_string(v)?;
        Ok(self)
    }

    pub fn put_uuid(&mut self, v: Uuid) -> Result<&mut Self> {
        self.schema.advance(FieldKind::Uuid)?;
        self.out.write_string(&v.hyphenated().to_string())?;
        Ok(self)
    }

    pub fn put_bool(&mut self, v: bool) -> Result<&mut Self> {
        self.schema.advance(FieldKind::Bool)?;
        self.out.write_bool(v);
        Ok(self)
    }

    pub fn put_i8(&mut self, v: i8) -> Result<&mut Self> {
        self.schema.advance(FieldKind::I8)?;
        self.out.write_i8(v);
        Ok(self)
    }

    pub fn put_i16(&mut self, v: i16) -> Result<&mut Self> {
        self.schema.advance(FieldKind::I16)?;
        self.out.write_i16(v);
        Ok(self)
    }

    pub fn put_i32(&mut self, v: i32) -> Result<&mut Self> {
        self.schema.advance(FieldKind::I32)?;
        self.out.write_i32(v);
        Ok(self)
    }

    pub fn put_i64(&mut self, v: i64) -> Result<&mut Self> {
        self.schema.advance(FieldKind::I64)?;
        self.out.write_i64(v);
        Ok(self)
    }

    pub fn put_f32(&mut self, v: f32) -> Result<&mut Self> {
        self.schema.advance(FieldKind::F32)?;
        self.out.write_f32(v);
        Ok(self)
    }

    pub fn put_f64(&mut self, v: f64) -> Result<&mut Self> {
        self.schema.advance(FieldKind::F64)?;
        self.out.write_f64(v);
        Ok(self)
    }

    /// Serialize `v` as a JSON object into a single string field.
    pub fn put_map<T: Serialize + ?Sized>(&mut self, v: &T) -> Result<&mut Self> {
        self.schema.advance(FieldKind::Map)?;
        let value = serde_json::to_value(v)
            .map_err(|e| RelayError::Encoding(format!("map encode failed: {e}")))?;
        if !value.is_object() {
            return Err(RelayError::Encoding("map field must serialize to an object".into()));
        }
        self.out.write_string(&value.to_string())?;
        Ok(self)
    }

    /// Closed-set value, written as its canonical name.
    pub fn put_symbol<S: Symbol>(&mut self, v: S) -> Result<&mut Self> {
        self.schema.advance(FieldKind::Symbol)?;
        self.out.write_string(v.name())?;
        Ok(self)
    }

    /// Raw trailing bytes; the schema only allows this last.
    pub fn put_tail(&mut self, v: &[u8]) -> Result<&mut Self> {
        self.schema.advance(FieldKind::Tail)?;
        self.out.write_bytes(v);
        Ok(self)
    }

    /// Complete payload. Fails if declared fields were never written.
    pub fn finish(self) -> Result<Bytes> {
        if let Some(missing) = self.schema.next() {
            return Err(RelayError::SchemaMismatch {
                action: self.schema.action(),
                position: self.schema.position(),
                expected: Some(missing),
                found: None,
            });
        }
        Ok(self.out.finish())
    }
}
