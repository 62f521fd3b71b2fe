//! Forward-only binary cursor (panic-free).
//!
//! Parsing rules:
//! - Never index into the buffer; always check `remaining()` before a `Buf` get.
//! - Reading past the end is a `Truncated` error, never a short read.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{RelayError, Result};
use crate::protocol::mutf8;

/// Append-only writer for big-endian primitives and length-prefixed strings.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: BytesMut,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(cap),
        }
    }

    /// u16 length prefix followed by modified UTF-8.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        let encoded = mutf8::encode(s)?;
        self.buf.reserve(2 + encoded.len());
        // encode() caps the length at u16::MAX
        self.buf.put_u16(encoded.len() as u16);
        self.buf.put_slice(&encoded);
        Ok(())
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.put_u8(u8::from(v));
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.put_i8(v);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.put_i16(v);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.put_i32(v);
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.put_i64(v);
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.put_f32(v);
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.put_f64(v);
    }

    /// Raw bytes with no prefix. Only meaningful as the last write.
    pub fn write_bytes(&mut self, v: &[u8]) {
        self.buf.put_slice(v);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Forward-only reader over an immutable buffer.
#[derive(Debug, Clone)]
pub struct ByteReader {
    buf: Bytes,
}

impl ByteReader {
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, needed: usize) -> Result<()> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(RelayError::Truncated { needed, remaining });
        }
        Ok(())
    }

    pub fn read_string(&mut self) -> Result<String> {
        self.need(2)?;
        let len = usize::from(self.buf.get_u16());
        self.need(len)?;
        let raw = self.buf.split_to(len);
        mutf8::decode(&raw)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.need(1)?;
        Ok(self.buf.get_u8() != 0)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.need(1)?;
        Ok(self.buf.get_i8())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.need(2)?;
        Ok(self.buf.get_i16())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.need(4)?;
        Ok(self.buf.get_i32())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.need(8)?;
        Ok(self.buf.get_i64())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.need(4)?;
        Ok(self.buf.get_f32())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.need(8)?;
        Ok(self.buf.get_f64())
    }

    /// Consume everything left (zero-copy).
    pub fn read_remaining_bytes(&mut self) -> Bytes {
        self.buf.split_to(self.buf.len())
    }
}
