//! JSON-file-backed key-value store

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{Error, Result};

use super::KeyValueStore;

const STATE_FILE: &str = "state.json";

/// Key-value store persisted as a single JSON object file
///
/// Every `set` rewrites the whole file. The file lives under the platform
/// data directory unless an explicit directory is given.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STATE_FILE),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store under the platform data directory
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "groundwatch")
            .ok_or_else(|| Error::config("cannot determine a platform data directory"))?;
        Ok(Self::new(dirs.data_dir()))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock();

        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        debug!(path = %self.path.display(), %key, "state written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("acknowledgedAlerts", r#"["E1"]"#).unwrap();
        assert_eq!(
            store.get("acknowledgedAlerts").unwrap().as_deref(),
            Some(r#"["E1"]"#)
        );

        // A fresh handle sees the same file.
        let reopened = FileStore::new(dir.path());
        assert_eq!(
            reopened.get("acknowledgedAlerts").unwrap().as_deref(),
            Some(r#"["E1"]"#)
        );
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get("acknowledgedAlerts").unwrap().is_none());
    }

    #[test]
    fn set_preserves_other_slots() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn corrupt_file_surfaces_malformed_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path(), "{{not json").unwrap();

        assert!(store.get("acknowledgedAlerts").is_err());
    }
}
