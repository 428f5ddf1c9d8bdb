//! In-memory cache store

use crate::error::PrecacheResult;
use crate::store::{CacheStore, CachedEntry};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

type Caches = HashMap<String, HashMap<String, CachedEntry>>;

/// In-process cache store backend
///
/// Writes to a cache that was never opened create it implicitly, the way
/// a put through an open cache handle would.
#[derive(Default)]
pub struct MemoryStore {
    caches: RwLock<Caches>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all caches
    pub async fn total_entries(&self) -> usize {
        self.caches.read().await.values().map(|c| c.len()).sum()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn open(&self, cache: &str) -> PrecacheResult<()> {
        self.caches
            .write()
            .await
            .entry(cache.to_string())
            .or_default();
        Ok(())
    }

    async fn cache_names(&self) -> PrecacheResult<Vec<String>> {
        let mut names: Vec<String> = self.caches.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete_cache(&self, cache: &str) -> PrecacheResult<bool> {
        Ok(self.caches.write().await.remove(cache).is_some())
    }

    async fn get(&self, cache: &str, key: &str) -> PrecacheResult<Option<CachedEntry>> {
        Ok(self
            .caches
            .read()
            .await
            .get(cache)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn put(&self, cache: &str, key: &str, entry: CachedEntry) -> PrecacheResult<()> {
        self.caches
            .write()
            .await
            .entry(cache.to_string())
            .or_default()
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, cache: &str, key: &str) -> PrecacheResult<bool> {
        Ok(self
            .caches
            .write()
            .await
            .get_mut(cache)
            .map(|entries| entries.remove(key).is_some())
            .unwrap_or(false))
    }

    async fn entry_keys(&self, cache: &str) -> PrecacheResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .caches
            .read()
            .await
            .get(cache)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
