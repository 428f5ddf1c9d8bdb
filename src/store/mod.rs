//! Versioned cache storage
//!
//! A store holds named caches (one per deployed version); each cache maps
//! request URLs to stored responses. Key-level operations are atomic and
//! last-write-wins, which is safe because concurrent writes for a key
//! always carry semantically equivalent content.

mod entry;
mod memory;

pub use entry::{body_checksum, CachedEntry};
pub use memory::MemoryStore;

use crate::error::PrecacheResult;
use async_trait::async_trait;

/// Trait for cache storage backends
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Open a named cache, creating it if absent
    async fn open(&self, cache: &str) -> PrecacheResult<()>;

    /// List all cache names in the store
    async fn cache_names(&self) -> PrecacheResult<Vec<String>>;

    /// Delete a whole cache and every entry it owns
    ///
    /// Returns false if no cache by that name existed.
    async fn delete_cache(&self, cache: &str) -> PrecacheResult<bool>;

    /// Look up an entry by key
    async fn get(&self, cache: &str, key: &str) -> PrecacheResult<Option<CachedEntry>>;

    /// Store an entry, overwriting any previous value for the key
    async fn put(&self, cache: &str, key: &str, entry: CachedEntry) -> PrecacheResult<()>;

    /// Delete a single entry. Returns false if the key was absent.
    async fn delete(&self, cache: &str, key: &str) -> PrecacheResult<bool>;

    /// List the keys stored in a cache
    async fn entry_keys(&self, cache: &str) -> PrecacheResult<Vec<String>>;
}
