// Key-value persistence backends

use eyre::{Result, eyre};
use std::collections::HashMap;

mod file;
mod sqlite;

pub use file::FileKv;
pub use sqlite::SqliteKv;

/// Durable key-value storage for snapshot blobs
///
/// Both calls block until the backend has finished, so a returned `Ok` from
/// `set` means the blob is durable.
pub trait KeyValueStore {
    /// Read the blob stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`
    fn set(&mut self, key: &str, blob: &str) -> Result<()>;
}

impl KeyValueStore for Box<dyn KeyValueStore> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<()> {
        (**self).set(key, blob)
    }
}

/// In-memory backend; contents are lost when it is dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<()> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Keys double as file names for `FileKv`, so keep them to a safe alphabet
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Storage key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Storage key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid storage key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}
