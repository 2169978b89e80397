use std::collections::HashMap;
use std::sync::RwLock;

use crate::cache::domain::cache_store::{CacheError, CacheStore, CachedResponse};

/// Process-local cache store. Entries never expire and are never evicted.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn save(&self, key: &str, response: CachedResponse) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.to_string(), response);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<CachedResponse, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        entries.get(key).cloned().ok_or(CacheError::Miss)
    }
}
