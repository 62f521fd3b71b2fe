//! Lenient resolution of free-text strings against a closed symbol set.
//!
//! The action tag (and any other closed-set field) travels as text, and proxy
//! and backend builds are versioned independently. Resolution walks a fixed
//! fallback chain and returns on the first hit:
//!
//! 1. the raw input against each canonical name;
//! 2. the input upper-cased;
//! 3. upper-cased with spaces replaced by `_`;
//! 4. step 3 with every `_` removed, compared to each name with its `_` removed.
//!
//! Within a step candidates are tried in declaration order, so if two symbols
//! collapse to the same key the first declared wins.

use std::fmt;

use crate::error::{RelayError, Result};

/// A member of a closed, ordered set of identifiers.
pub trait Symbol: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Label used in diagnostics ("action", "chat scope", ...).
    const KIND: &'static str;

    /// Every member, in declaration order.
    fn variants() -> &'static [Self];

    /// Canonical uppercase-with-underscores name.
    fn name(self) -> &'static str;

    /// Extra lookup consulted before canonical names at every step.
    ///
    /// Lets a set accept retired spellings without polluting its names.
    fn alias(_key: &str) -> Option<Self> {
        None
    }
}

fn lookup<S: Symbol>(key: &str) -> Option<S> {
    S::alias(key).or_else(|| S::variants().iter().copied().find(|s| s.name() == key))
}

fn lookup_crunched<S: Symbol>(key: &str) -> Option<S> {
    let key = key.replace('_', "");
    S::alias(&key).or_else(|| {
        S::variants()
            .iter()
            .copied()
            .find(|s| s.name().replace('_', "") == key)
    })
}

/// Resolve and report which step of the chain matched (1 to 4).
pub(crate) fn resolve_step<S: Symbol>(raw: &str) -> Option<(u8, S)> {
    if let Some(s) = lookup(raw) {
        return Some((1, s));
    }

    let upper = raw.to_uppercase();
    let underscored = upper.replace(' ', "_");
    lookup(&upper)
        .map(|s| (2, s))
        .or_else(|| lookup(&underscored).map(|s| (3, s)))
        .or_else(|| lookup_crunched(&underscored).map(|s| (4, s)))
}

/// Resolve without building an error.
pub fn resolve_silent<S: Symbol>(raw: &str) -> Option<S> {
    let (step, s) = resolve_step::<S>(raw)?;
    if step > 1 {
        // drifted spelling from a peer on another build
        tracing::debug!(kind = S::KIND, raw, step, resolved = s.name(), "symbol resolved by fallback");
    }
    Some(s)
}

/// Resolve `raw` through the fallback chain or fail listing every candidate.
pub fn resolve<S: Symbol>(raw: &str) -> Result<S> {
    resolve_silent(raw).ok_or_else(|| unknown::<S>(raw))
}

pub(crate) fn unknown<S: Symbol>(raw: &str) -> RelayError {
    RelayError::UnknownSymbol {
        kind: S::KIND,
        value: raw.to_string(),
        candidates: S::variants().iter().map(|s| s.name()).collect(),
    }
}
