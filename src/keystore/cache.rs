//! In-memory key cache
//!
//! Read-through cache of decoded key entries over the host's store, keyed
//! by name under a single RwLock. Every eviction path zeroes private key
//! material before release.

use crate::errors::Result;
use crate::keystore::entry::{store_path, KeyEntry, STORE_PREFIX};
use crate::keystore::store::{InvalidationSink, SecretStore};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Read-through key cache
pub struct KeyCache {
    /// Map of key name -> decoded entry
    entries: RwLock<HashMap<String, KeyEntry>>,
    store: Arc<dyn SecretStore>,
}

impl KeyCache {
    /// Create an empty cache over a store
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// Get a key entry, loading it from the store on a cache miss.
    /// An absent key is `Ok(None)`, not an error.
    pub fn get(&self, name: &str) -> Result<Option<KeyEntry>> {
        {
            let entries = self.entries.read().unwrap();
            if let Some(entry) = entries.get(name) {
                return Ok(Some(entry.clone()));
            }
        }

        // Miss: fetch and decode outside the lock
        let Some(raw) = self.store.get(&store_path(name))? else {
            return Ok(None);
        };

        let entry: KeyEntry = serde_json::from_slice(&raw)?;
        entry.validate()?;

        let mut entries = self.entries.write().unwrap();
        // A racing loader may have inserted first. Entries are immutable,
        // so keep the cached copy; the losing one zeroizes on drop.
        let cached = entries.entry(name.to_string()).or_insert(entry);
        debug!("Cached key from store: {}", name);
        Ok(Some(cached.clone()))
    }

    /// Insert an entry under a name, replacing any previous one
    pub fn set(&self, name: &str, entry: KeyEntry) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(name.to_string(), entry);
    }

    /// Remove one entry, zeroing its key material
    pub fn delete(&self, name: &str) {
        let mut entries = self.entries.write().unwrap();
        if let Some(mut entry) = entries.remove(name) {
            entry.zero_private_key();
        }
    }

    /// Handle a storage-change notification from the host
    pub fn invalidate(&self, path: &str) {
        if path == STORE_PREFIX {
            let count = self.cleanup();
            debug!("Invalidated all cached keys ({})", count);
            return;
        }

        if let Some(name) = path.strip_prefix(STORE_PREFIX) {
            if !name.is_empty() {
                self.delete(name);
                debug!("Invalidated cached key: {}", name);
            }
        }
        // Paths outside the key prefix are not ours to handle
    }

    /// Zero and drop every cached entry, returning how many were held.
    /// Entries whose key material is already cleared are fine.
    pub fn cleanup(&self) -> usize {
        let mut entries = self.entries.write().unwrap();
        let count = entries.len();
        for (_, mut entry) in entries.drain() {
            entry.zero_private_key();
        }
        count
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap();
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InvalidationSink for KeyCache {
    fn invalidate(&self, path: &str) {
        KeyCache::invalidate(self, path);
    }
}
