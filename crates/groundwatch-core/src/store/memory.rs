//! In-memory key-value store for tests

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::{Error, Result};

use super::KeyValueStore;

/// In-memory [`KeyValueStore`] fake
///
/// Writes can be made to fail on demand to exercise degraded-storage paths.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with a storage error
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if *self.fail_writes.lock() {
            return Err(Error::Storage(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
