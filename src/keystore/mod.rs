//! Key storage and management
//!
//! This module provides:
//! - The stored key entry model and its JSON document form
//! - A read-through in-memory key cache with zeroing eviction
//! - The storage and invalidation seams the host implements
//! - Key lifecycle operations (generate, import, export, delete)

pub mod cache;
pub mod entry;
pub mod lifecycle;
pub mod store;

pub use cache::KeyCache;
pub use entry::{store_path, KeyEntry, STORE_PREFIX};
pub use lifecycle::KeyLifecycle;
pub use store::{InvalidationSink, MemoryStore, SecretStore};
