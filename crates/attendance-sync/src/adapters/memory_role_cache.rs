//! In-memory stand-in for the durable role-cache tier.
//!
//! Real deployments back this with device storage that survives restart;
//! the contract is identical.

use crate::domain::{CacheKey, Role, SyncError};
use crate::ports::RoleCacheStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory durable-tier role cache.
#[derive(Default)]
pub struct InMemoryRoleCacheStore {
    entries: RwLock<HashMap<CacheKey, Role>>,
}

impl InMemoryRoleCacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl RoleCacheStore for InMemoryRoleCacheStore {
    fn load(&self, key: &CacheKey) -> Result<Option<Role>, SyncError> {
        Ok(self.entries.read().get(key).copied())
    }

    fn store(&self, key: &CacheKey, role: Role) -> Result<(), SyncError> {
        self.entries.write().insert(key.clone(), role);
        Ok(())
    }

    fn remove(&self, key: &CacheKey) -> Result<(), SyncError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), SyncError> {
        self.entries.write().clear();
        Ok(())
    }
}
