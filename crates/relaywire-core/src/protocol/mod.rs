//! Channel message protocol.
//!
//! Every message is a fixed envelope (sender id, origin server, action)
//! followed by the action's ordered fields:
//!
//! ```text
//! [string senderId][string originServer][string action][...fields...]
//! ```
//!
//! Strings are u16-length-prefixed modified UTF-8, numbers are big-endian.
//! There are no in-band type tags; each action declares its field schema and
//! both the writer and the reader check every field against it.

pub mod cursor;
pub mod envelope;
pub mod mutf8;
pub mod reader;
pub mod schema;
pub mod symbol;
pub mod writer;

/// Transport channel name shared by every writer and reader in the process.
pub const CHANNEL: &str = "relaywire:main";

pub use envelope::Envelope;
pub use reader::MessageReader;
pub use schema::{Action, FieldKind};
pub use symbol::{resolve, Symbol};
pub use writer::MessageWriter;
