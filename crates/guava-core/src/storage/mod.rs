//! Local key-value storage.
//!
//! Stands in for browser local storage: a flat map of string keys to string
//! values. Every component that persists client state receives a store
//! explicitly instead of reaching for a global.

mod file;
mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Access token key.
pub const ACCESS_TOKEN_KEY: &str = "access";
/// Refresh token key.
pub const REFRESH_TOKEN_KEY: &str = "refresh";
/// Preference blob key.
pub const PREFERENCES_KEY: &str = "guava:prefs";
/// Cached subscription list key.
pub const SUBSCRIPTIONS_KEY: &str = "guava:subscriptions";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage lock poisoned: {0}")]
    Poisoned(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

pub trait KeyValueStore: Clone + Send + Sync + 'static {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Read and deserialize a JSON value. Unparsable content is an error.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}
