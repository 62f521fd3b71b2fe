//! Owned, single-flight memo for symbol resolution.
//!
//! The first caller for a raw string runs the fallback chain and publishes the
//! settled result in a per-key cell; concurrent callers for the same key wait
//! on that cell instead of repeating the work. The owner picks the capacity and
//! decides when to clear it. Past capacity new keys still resolve, they are
//! just not remembered.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::Result;
use crate::protocol::symbol::{self, Symbol};

pub struct SymbolCache<S> {
    entries: DashMap<String, Arc<OnceLock<Option<S>>>>,
    /// Slots claimed so far; never exceeds `capacity`.
    used: AtomicUsize,
    capacity: usize,
}

impl<S: Symbol> SymbolCache<S> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            used: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Resolve `raw`, reusing a settled result when one exists.
    pub fn resolve(&self, raw: &str) -> Result<S> {
        let cell = match self.cell(raw) {
            Some(cell) => cell,
            None => return symbol::resolve(raw),
        };
        // initialize outside the shard lock so only same-key callers wait
        match *cell.get_or_init(|| symbol::resolve_silent::<S>(raw)) {
            Some(s) => Ok(s),
            None => Err(symbol::unknown::<S>(raw)),
        }
    }

    fn cell(&self, raw: &str) -> Option<Arc<OnceLock<Option<S>>>> {
        if let Some(existing) = self.entries.get(raw) {
            return Some(Arc::clone(existing.value()));
        }
        match self.entries.entry(raw.to_string()) {
            Entry::Occupied(e) => Some(Arc::clone(e.get())),
            Entry::Vacant(e) => {
                // claim a slot while the shard is locked
                self.used
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                        (n < self.capacity).then_some(n + 1)
                    })
                    .ok()?;
                let cell = Arc::new(OnceLock::new());
                e.insert(Arc::clone(&cell));
                Some(cell)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries.retain(|_, _| {
            self.used.fetch_sub(1, Ordering::AcqRel);
            false
        });
    }
}
