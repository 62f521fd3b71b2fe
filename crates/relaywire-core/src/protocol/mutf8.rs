//! Modified UTF-8, as written by JVM `DataOutput::writeUTF`.
//!
//! Differences from standard UTF-8:
//! - U+0000 is encoded as the two bytes `C0 80`.
//! - Characters outside the BMP are encoded as a UTF-16 surrogate pair, each
//!   half taking three bytes (six bytes in total).
//!
//! Backends built on the JVM read and write strings this way, so the proxy must
//! produce byte-identical output for anything that is not plain ASCII.

use crate::error::{RelayError, Result};

/// Largest encoded string that fits behind a u16 length prefix.
pub const MAX_ENCODED_LEN: usize = u16::MAX as usize;

/// Number of bytes `s` takes once encoded.
pub fn encoded_len(s: &str) -> usize {
    s.encode_utf16().map(unit_len).sum()
}

fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007F => 1,
        0x0000 | 0x0080..=0x07FF => 2,
        _ => 3,
    }
}

/// Encode `s`, failing if the result would not fit a u16 length prefix.
pub fn encode(s: &str) -> Result<Vec<u8>> {
    let len = encoded_len(s);
    if len > MAX_ENCODED_LEN {
        return Err(RelayError::Encoding(format!(
            "string too long: {len} encoded bytes (max {MAX_ENCODED_LEN})"
        )));
    }

    let mut out = Vec::with_capacity(len);
    for unit in s.encode_utf16() {
        match unit_len(unit) {
            1 => out.push(unit as u8),
            2 => {
                out.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    Ok(out)
}

/// Decode modified UTF-8 bytes into a `String`.
///
/// Rejects truncated multi-byte sequences, stray continuation bytes, four-byte
/// forms and unpaired surrogates.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().enumerate();

    while let Some((pos, b)) = iter.next() {
        let unit = match b >> 4 {
            0x0..=0x7 => u16::from(b),
            0xC | 0xD => {
                let b2 = continuation(iter.next(), pos)?;
                (u16::from(b & 0x1F) << 6) | b2
            }
            0xE => {
                let b2 = continuation(iter.next(), pos)?;
                let b3 = continuation(iter.next(), pos)?;
                (u16::from(b & 0x0F) << 12) | (b2 << 6) | b3
            }
            _ => {
                return Err(RelayError::Encoding(format!(
                    "malformed input around byte {pos}"
                )))
            }
        };
        units.push(unit);
    }

    String::from_utf16(&units)
        .map_err(|_| RelayError::Encoding("unpaired surrogate in string".into()))
}

fn continuation(next: Option<(usize, u8)>, start: usize) -> Result<u16> {
    match next {
        Some((_, b)) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
        Some((pos, _)) => Err(RelayError::Encoding(format!(
            "malformed input around byte {pos}"
        ))),
        None => Err(RelayError::Encoding(format!(
            "partial character at end of input (starts at byte {start})"
        ))),
    }
}
