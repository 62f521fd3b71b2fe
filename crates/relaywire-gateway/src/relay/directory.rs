use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::relay::link::{BackendLink, Destination};

/// Read-only view of the servers a message can be forwarded to.
pub trait Directory: Send + Sync {
    /// Snapshot of every destination, in registration order.
    fn list(&self) -> Vec<Arc<dyn Destination>>;
    fn get(&self, name: &str) -> Option<Arc<dyn Destination>>;
}

#[derive(Clone)]
struct DirectoryEntry {
    link: Arc<BackendLink>,
    registered_seq: u64,
}

/// Connected backends: `server name -> link`.
///
/// A backend reconnecting under the same name replaces its previous link.
#[derive(Default)]
pub struct ServerDirectory {
    links: DashMap<String, DirectoryEntry>,
    seq: AtomicU64,
}

impl ServerDirectory {
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Register `link`, returning the link it replaced.
    pub fn insert(&self, link: Arc<BackendLink>) -> Option<Arc<BackendLink>> {
        let registered_seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let name = link.name().to_string();
        self.links
            .insert(name, DirectoryEntry { link, registered_seq })
            .map(|prev| prev.link)
    }

    /// Remove `name` only if it is still the connection `conn_id`.
    pub fn remove(&self, name: &str, conn_id: u64) -> Option<Arc<BackendLink>> {
        self.links
            .remove_if(name, |_, e| e.link.conn_id() == conn_id)
            .map(|(_, e)| e.link)
    }

    pub fn link(&self, name: &str) -> Option<Arc<BackendLink>> {
        self.links.get(name).map(|r| Arc::clone(&r.value().link))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn ordered(&self) -> Vec<DirectoryEntry> {
        let mut entries: Vec<DirectoryEntry> = self.links.iter().map(|r| r.value().clone()).collect();
        entries.sort_by_key(|e| e.registered_seq);
        entries
    }

    /// Concrete links in registration order.
    pub fn links(&self) -> Vec<Arc<BackendLink>> {
        self.ordered().into_iter().map(|e| e.link).collect()
    }
}

impl Directory for ServerDirectory {
    fn list(&self) -> Vec<Arc<dyn Destination>> {
        self.ordered()
            .into_iter()
            .map(|e| e.link as Arc<dyn Destination>)
            .collect()
    }

    fn get(&self, name: &str) -> Option<Arc<dyn Destination>> {
        self.link(name).map(|l| l as Arc<dyn Destination>)
    }
}
