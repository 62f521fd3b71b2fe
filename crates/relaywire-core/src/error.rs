//! Shared error type across relaywire crates.

use thiserror::Error;

use crate::protocol::schema::FieldKind;

/// Stable error codes (used in logs and test vectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Cursor ran past the end of the buffer.
    Truncated,
    /// Malformed length prefix or invalid string bytes.
    Encoding,
    /// Closed-set string did not resolve to any symbol.
    UnknownSymbol,
    /// Field read/written out of the action's declared order.
    SchemaMismatch,
    /// Forward target is not a routable connection.
    UnsupportedDestination,
    /// Destination went away before the send completed.
    Disconnected,
    /// Invalid configuration.
    Config,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Truncated => "TRUNCATED",
            ErrorCode::Encoding => "ENCODING",
            ErrorCode::UnknownSymbol => "UNKNOWN_SYMBOL",
            ErrorCode::SchemaMismatch => "SCHEMA_MISMATCH",
            ErrorCode::UnsupportedDestination => "UNSUPPORTED_DESTINATION",
            ErrorCode::Disconnected => "DISCONNECTED",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("truncated message: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("unknown {kind} '{value}', available values: {}", .candidates.join(", "))]
    UnknownSymbol {
        kind: &'static str,
        value: String,
        candidates: Vec<&'static str>,
    },
    #[error(
        "schema mismatch in {action} at field {position}: expected {}, got {}",
        kind_or_end(.expected),
        kind_or_end(.found)
    )]
    SchemaMismatch {
        action: &'static str,
        position: usize,
        expected: Option<FieldKind>,
        found: Option<FieldKind>,
    },
    #[error("unsupported destination: {0}")]
    UnsupportedDestination(String),
    #[error("destination disconnected: {0}")]
    Disconnected(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

fn kind_or_end(kind: &Option<FieldKind>) -> &'static str {
    kind.map(FieldKind::as_str).unwrap_or("end of message")
}

impl RelayError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RelayError::Truncated { .. } => ErrorCode::Truncated,
            RelayError::Encoding(_) => ErrorCode::Encoding,
            RelayError::UnknownSymbol { .. } => ErrorCode::UnknownSymbol,
            RelayError::SchemaMismatch { .. } => ErrorCode::SchemaMismatch,
            RelayError::UnsupportedDestination(_) => ErrorCode::UnsupportedDestination,
            RelayError::Disconnected(_) => ErrorCode::Disconnected,
            RelayError::Config(_) => ErrorCode::Config,
            RelayError::Internal(_) => ErrorCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_symbol_lists_candidates() {
        let e = RelayError::UnknownSymbol {
            kind: "action",
            value: "bogus".into(),
            candidates: vec!["BROADCAST", "JOIN_SERVER"],
        };
        assert_eq!(
            e.to_string(),
            "unknown action 'bogus', available values: BROADCAST, JOIN_SERVER"
        );
        assert_eq!(e.code().as_str(), "UNKNOWN_SYMBOL");
    }

    #[test]
    fn schema_mismatch_past_end() {
        let e = RelayError::SchemaMismatch {
            action: "BROADCAST",
            position: 1,
            expected: None,
            found: Some(FieldKind::I32),
        };
        assert_eq!(
            e.to_string(),
            "schema mismatch in BROADCAST at field 1: expected end of message, got I32"
        );
    }
}
