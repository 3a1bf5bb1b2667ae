//! Storage and invalidation seams
//!
//! The backend never talks to disk or network itself. The host supplies a
//! byte-oriented key-value store and pushes storage-change notifications;
//! these traits are those two seams. `MemoryStore` is the reference store
//! for tests and embedded hosts.

use crate::errors::Result;
use std::collections::HashMap;
use std::sync::RwLock;

/// Byte-oriented key-value store owned by the host
pub trait SecretStore: Send + Sync {
    /// Read the value at a path; absence is `None`, not an error
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Write a value, overwriting any existing value at the path
    fn put(&self, path: &str, value: &[u8]) -> Result<()>;

    /// Delete the value at a path; deleting an absent path is not an error
    fn delete(&self, path: &str) -> Result<()>;

    /// List stored paths that start with a prefix
    fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Push side of the host's storage-change notifications
pub trait InvalidationSink: Send + Sync {
    /// A stored path changed outside this process
    fn invalidate(&self, path: &str);
}

/// In-memory `SecretStore`
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(path).cloned())
    }

    fn put(&self, path: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(path.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(path);
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().unwrap();
        let mut paths: Vec<String> = entries
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }
}
