//! relaywire core: the proxy <-> backend channel message protocol.
//!
//! This crate defines the wire-level contracts (binary cursor, message
//! envelope, ordered typed fields), the lenient symbol resolver used for the
//! action tag and other closed-set strings, and the error surface shared with
//! the gateway. It carries no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Malformed input always surfaces as `RelayError` so one bad message never
//! takes down the process handling it.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod cache;
pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorCode, RelayError, Result};
