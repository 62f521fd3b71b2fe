//! Per-action field schemas.
//!
//! Fields carry no type tags on the wire, so every action declares the exact
//! ordered list of kinds it carries. Writers and readers both check each field
//! against this list and fail with `SchemaMismatch` instead of producing or
//! consuming misaligned bytes.

use std::fmt;

use crate::error::{RelayError, Result};
use crate::protocol::symbol::Symbol;

/// Semantic type of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    /// Canonical hyphenated UUID text.
    Uuid,
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// JSON object text.
    Map,
    /// Canonical name of a closed-set symbol.
    Symbol,
    /// Everything left in the message; only valid last.
    Tail,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "STRING",
            FieldKind::Uuid => "UUID",
            FieldKind::Bool => "BOOL",
            FieldKind::I8 => "I8",
            FieldKind::I16 => "I16",
            FieldKind::I32 => "I32",
            FieldKind::I64 => "I64",
            FieldKind::F32 => "F32",
            FieldKind::F64 => "F64",
            FieldKind::Map => "MAP",
            FieldKind::Symbol => "SYMBOL",
            FieldKind::Tail => "TAIL",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action tag: a symbol that also declares its field schema.
pub trait Action: Symbol {
    fn schema(self) -> &'static [FieldKind];
}

/// Walks an action's schema one field at a time.
#[derive(Debug, Clone)]
pub(crate) struct SchemaCursor {
    action: &'static str,
    fields: &'static [FieldKind],
    position: usize,
    last: Option<FieldKind>,
}

impl SchemaCursor {
    /// Fails if the schema places `Tail` anywhere but last.
    pub(crate) fn new<A: Action>(action: A) -> Result<Self> {
        let fields = action.schema();
        if let Some(position) = fields.iter().position(|k| *k == FieldKind::Tail) {
            if position + 1 != fields.len() {
                return Err(RelayError::SchemaMismatch {
                    action: action.name(),
                    position: position + 1,
                    expected: None,
                    found: fields.get(position + 1).copied(),
                });
            }
        }
        Ok(Self {
            action: action.name(),
            fields,
            position: 0,
            last: None,
        })
    }

    /// Check that `found` is the next declared field and advance.
    pub(crate) fn advance(&mut self, found: FieldKind) -> Result<()> {
        // nothing follows a tail
        let expected = match self.last {
            Some(FieldKind::Tail) => None,
            _ => self.fields.get(self.position).copied(),
        };
        if expected != Some(found) {
            return Err(RelayError::SchemaMismatch {
                action: self.action,
                position: self.position,
                expected,
                found: Some(found),
            });
        }
        self.position += 1;
        self.last = Some(found);
        Ok(())
    }

    /// Next kind the schema expects, if any.
    pub(crate) fn next(&self) -> Option<FieldKind> {
        self.fields.get(self.position).copied()
    }

    pub(crate) fn last(&self) -> Option<FieldKind> {
        self.last
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn action(&self) -> &'static str {
        self.action
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Ping;

    impl Symbol for Ping {
        const KIND: &'static str = "action";
        fn variants() -> &'static [Self] {
            &[Ping]
        }
        fn name(self) -> &'static str {
            "PING"
        }
    }

    impl Action for Ping {
        fn schema(self) -> &'static [FieldKind] {
            &[FieldKind::I64, FieldKind::String]
        }
    }

    #[test]
    fn walks_schema_in_order() {
        let mut c = SchemaCursor::new(Ping).unwrap();
        assert_eq!(c.next(), Some(FieldKind::I64));
        c.advance(FieldKind::I64).unwrap();
        assert_eq!(c.last(), Some(FieldKind::I64));
        c.advance(FieldKind::String).unwrap();
        assert_eq!(c.next(), None);
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn wrong_kind_is_rejected_without_advancing() {
        let mut c = SchemaCursor::new(Ping).unwrap();
        let err = c.advance(FieldKind::String).unwrap_err();
        assert!(matches!(
            err,
            RelayError::SchemaMismatch {
                action: "PING",
                position: 0,
                expected: Some(FieldKind::I64),
                found: Some(FieldKind::String),
            }
        ));
        assert_eq!(c.position(), 0);
        assert_eq!(c.last(), None);
    }

    #[test]
    fn reading_past_schema_is_rejected() {
        let mut c = SchemaCursor::new(Ping).unwrap();
        c.advance(FieldKind::I64).unwrap();
        c.advance(FieldKind::String).unwrap();
        assert!(matches!(
            c.advance(FieldKind::Bool),
            Err(RelayError::SchemaMismatch { expected: None, .. })
        ));
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Misplaced;

    impl Symbol for Misplaced {
        const KIND: &'static str = "action";
        fn variants() -> &'static [Self] {
            &[Misplaced]
        }
        fn name(self) -> &'static str {
            "MISPLACED"
        }
    }

    impl Action for Misplaced {
        fn schema(self) -> &'static [FieldKind] {
            &[FieldKind::Tail, FieldKind::String]
        }
    }

    #[test]
    fn tail_must_be_last() {
        assert!(matches!(
            SchemaCursor::new(Misplaced),
            Err(RelayError::SchemaMismatch {
                action: "MISPLACED",
                position: 1,
                expected: None,
                found: Some(FieldKind::String),
            })
        ));
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Forward;

    impl Symbol for Forward {
        const KIND: &'static str = "action";
        fn variants() -> &'static [Self] {
            &[Forward]
        }
        fn name(self) -> &'static str {
            "FORWARD"
        }
    }

    impl Action for Forward {
        fn schema(self) -> &'static [FieldKind] {
            &[FieldKind::String, FieldKind::Tail]
        }
    }

    #[test]
    fn nothing_is_accepted_after_a_tail() {
        let mut c = SchemaCursor::new(Forward).unwrap();
        c.advance(FieldKind::String).unwrap();
        c.advance(FieldKind::Tail).unwrap();
        assert!(matches!(
            c.advance(FieldKind::Tail),
            Err(RelayError::SchemaMismatch { position: 2, expected: None, .. })
        ));
    }
}
