use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{KeyValueStore, StorageError, StorageResult};

/// Store persisted as a single JSON object on disk.
///
/// The file is re-read on every access so separate processes observe each
/// other's writes. Writes within one process are serialized; across processes
/// the last writer wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn modify(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> StorageResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|error| StorageError::Poisoned(error.to_string()))?;
        let mut entries = self.read_entries()?;
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}
