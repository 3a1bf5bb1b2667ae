//! Key lifecycle operations
//!
//! Generate, import, export, and delete keys. All writes go to the store
//! first, then the cache; reads go through the cache. Exported material
//! travels in a zeroizing wrapper and only leaves for exportable keys.

use crate::crypto::ecdsa::{generate_signing_key, signing_key_from_bytes};
use crate::errors::{ChainSignError, Result};
use crate::keystore::cache::KeyCache;
use crate::keystore::entry::{store_path, KeyEntry, STORE_PREFIX};
use crate::keystore::store::SecretStore;
use crate::security::{new_secret_key, SecretKey};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::info;

/// Key lifecycle operations over a cache and its backing store
pub struct KeyLifecycle {
    cache: Arc<KeyCache>,
    store: Arc<dyn SecretStore>,
}

impl KeyLifecycle {
    pub fn new(cache: Arc<KeyCache>, store: Arc<dyn SecretStore>) -> Self {
        Self { cache, store }
    }

    /// Generate a fresh key under a name. An existing key of the same
    /// name is overwritten.
    pub fn generate(&self, name: &str, exportable: bool) -> Result<KeyEntry> {
        let signing_key = generate_signing_key();
        let entry = KeyEntry::new(&signing_key, exportable, false);
        self.persist(name, &entry)?;

        info!("Generated key: {} (exportable: {})", name, exportable);
        Ok(entry)
    }

    /// Import externally supplied key material (exactly 32 scalar bytes)
    pub fn import(&self, name: &str, material: &SecretKey, exportable: bool) -> Result<KeyEntry> {
        let signing_key = signing_key_from_bytes(material.expose_secret())?;
        let entry = KeyEntry::new(&signing_key, exportable, true);
        self.persist(name, &entry)?;

        info!("Imported key: {} (exportable: {})", name, exportable);
        Ok(entry)
    }

    /// Export the raw private key of an exportable key
    pub fn export(&self, name: &str) -> Result<SecretKey> {
        let entry = self
            .cache
            .get(name)?
            .ok_or_else(|| ChainSignError::key_not_found(name))?;

        if !entry.exportable {
            return Err(ChainSignError::KeyNotExportable);
        }

        info!("Exported key: {}", name);
        Ok(new_secret_key(entry.private_key.expose().to_vec()))
    }

    /// Delete a key from cache and store. Idempotent on an absent key.
    pub fn delete(&self, name: &str) -> Result<()> {
        self.cache.delete(name);
        self.store.delete(&store_path(name))?;

        info!("Deleted key: {}", name);
        Ok(())
    }

    /// Read a key through the cache
    pub fn get(&self, name: &str) -> Result<Option<KeyEntry>> {
        self.cache.get(name)
    }

    /// List stored key names, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let paths = self.store.list(STORE_PREFIX)?;
        let mut names: Vec<String> = paths
            .iter()
            .filter_map(|path| path.strip_prefix(STORE_PREFIX))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }

    fn persist(&self, name: &str, entry: &KeyEntry) -> Result<()> {
        let raw = serde_json::to_vec(entry)?;
        self.store.put(&store_path(name), &raw)?;
        self.cache.set(name, entry.clone());
        Ok(())
    }
}
