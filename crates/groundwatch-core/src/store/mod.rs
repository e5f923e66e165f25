//! Persistent state for Groundwatch
//!
//! The acknowledgment set is the only state that outlives the process. It is
//! kept behind a minimal key-value contract so the service core never touches
//! the filesystem directly and tests can swap in an in-memory fake.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::error::Result;

/// Minimal get/set-by-string-key persistence contract
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// The set of alert identifiers the operator has acknowledged
///
/// Membership is monotonic: identifiers are only ever added. The set is seeded
/// from the backing store at construction; a read failure or corrupt payload
/// seeds an empty set, so alerts fail open to unacknowledged. A write failure
/// keeps the in-memory entry and logs a warning; acknowledgments may then be
/// lost on restart.
pub struct AckStore {
    store: Arc<dyn KeyValueStore>,
    slot: String,
    ids: Mutex<HashSet<String>>,
}

impl AckStore {
    /// Seed the acknowledgment set from `slot` in the backing store
    pub fn new(store: Arc<dyn KeyValueStore>, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let ids = match store.get(&slot) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids.into_iter().collect(),
                Err(err) => {
                    warn!(%slot, %err, "corrupt acknowledgment state, starting empty");
                    HashSet::new()
                }
            },
            Ok(None) => HashSet::new(),
            Err(err) => {
                warn!(%slot, %err, "failed to read acknowledgment state, starting empty");
                HashSet::new()
            }
        };

        Self {
            store,
            slot,
            ids: Mutex::new(ids),
        }
    }

    /// Whether `id` has been acknowledged
    pub fn contains(&self, id: &str) -> bool {
        self.ids.lock().contains(id)
    }

    /// Snapshot of the current set
    pub fn snapshot(&self) -> HashSet<String> {
        self.ids.lock().clone()
    }

    /// Add `id` to the set and persist the full set
    ///
    /// Returns `false` without touching storage when the identifier is
    /// already present.
    pub fn insert(&self, id: &str) -> bool {
        let ids = {
            let mut guard = self.ids.lock();
            if !guard.insert(id.to_string()) {
                return false;
            }
            let mut ids: Vec<String> = guard.iter().cloned().collect();
            ids.sort();
            ids
        };

        match serde_json::to_string(&ids) {
            Ok(raw) => {
                if let Err(err) = self.store.set(&self.slot, &raw) {
                    warn!(%err, "failed to persist acknowledgment state");
                }
            }
            Err(err) => warn!(%err, "failed to encode acknowledgment state"),
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_monotonic_and_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let acks = AckStore::new(store.clone(), "acknowledgedAlerts");

        assert!(acks.insert("E2"));
        assert!(!acks.insert("E2"));
        assert!(acks.contains("E2"));
        assert_eq!(acks.snapshot().len(), 1);

        let raw = store.get("acknowledgedAlerts").unwrap().unwrap();
        let persisted: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, vec!["E2".to_string()]);
    }

    #[test]
    fn reseeds_from_persisted_slot() {
        let store = Arc::new(MemoryStore::new());
        store.set("acknowledgedAlerts", r#"["E1","E3"]"#).unwrap();

        let acks = AckStore::new(store, "acknowledgedAlerts");
        assert!(acks.contains("E1"));
        assert!(acks.contains("E3"));
        assert!(!acks.contains("E2"));
    }

    #[test]
    fn corrupt_slot_fails_open_to_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set("acknowledgedAlerts", "not json").unwrap();

        let acks = AckStore::new(store, "acknowledgedAlerts");
        assert!(acks.snapshot().is_empty());
    }

    #[test]
    fn write_failure_keeps_in_memory_entry() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);

        let acks = AckStore::new(store.clone(), "acknowledgedAlerts");
        assert!(acks.insert("E5"));
        assert!(acks.contains("E5"));
        assert!(store.get("acknowledgedAlerts").unwrap().is_none());
    }
}
