//! Per-request routing policy
//!
//! Documents are routed network-first: staleness is user-visible, so
//! correctness favors the network. Everything else is cache-first with a
//! background refresh: assets are numerous and change rarely, so latency
//! favors the cache while revalidation bounds staleness.

use crate::error::{PrecacheError, PrecacheResult};
use crate::fetch::{Network, Request, Response};
use crate::store::{CacheStore, CachedEntry};
use crate::worker::tasks::BackgroundTasks;
use std::sync::Arc;
use tracing::{debug, warn};
use url::{Origin, Url};

/// How an intercepted request was resolved
#[derive(Debug)]
pub enum FetchOutcome {
    /// Cross-origin request; the host performs its default handling
    NotIntercepted,
    /// Resolved by the routing policy
    Response(Response),
}

impl FetchOutcome {
    /// The resolved response, if the request was intercepted
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::NotIntercepted => None,
            Self::Response(response) => Some(response),
        }
    }

    pub fn is_intercepted(&self) -> bool {
        matches!(self, Self::Response(_))
    }
}

/// Routing policy over an injected store and network
pub struct Router {
    cache_name: String,
    origin: Origin,
    offline_url: String,
    store: Arc<dyn CacheStore>,
    network: Arc<dyn Network>,
    tasks: Arc<BackgroundTasks>,
}

impl Router {
    /// Create a router for one cache generation
    pub fn new(
        cache_name: String,
        origin: &Url,
        offline_url: String,
        store: Arc<dyn CacheStore>,
        network: Arc<dyn Network>,
        tasks: Arc<BackgroundTasks>,
    ) -> Self {
        Self {
            cache_name,
            origin: origin.origin(),
            offline_url,
            store,
            network,
            tasks,
        }
    }

    /// Resolve one intercepted request
    pub async fn route(&self, request: &Request) -> PrecacheResult<FetchOutcome> {
        if request.url.origin() != self.origin {
            debug!("Skipping cross-origin request: {}", request.url);
            return Ok(FetchOutcome::NotIntercepted);
        }

        let response = if request.accepts_html() {
            self.network_first(request).await?
        } else {
            self.cache_first(request).await?
        };

        Ok(FetchOutcome::Response(response))
    }

    /// Network-first with cache fallback, then offline document
    async fn network_first(&self, request: &Request) -> PrecacheResult<Response> {
        let key = request.cache_key().to_string();

        match self.network.fetch(request).await {
            Ok(response) => {
                // Cache a clone off the request path; the caller gets the
                // network response without waiting for the write.
                self.store_in_background(key, CachedEntry::from_response(&response));
                Ok(response)
            }
            Err(err) => {
                debug!("Network failed for document {}: {}", key, err);
                if let Some(entry) = self.store.get(&self.cache_name, &key).await? {
                    return Ok(entry.to_response(&key));
                }
                self.offline_fallback().await
            }
        }
    }

    /// Cache-first with stale-while-revalidate
    async fn cache_first(&self, request: &Request) -> PrecacheResult<Response> {
        let key = request.cache_key().to_string();

        if let Some(entry) = self.store.get(&self.cache_name, &key).await? {
            self.revalidate_in_background(request.clone(), entry.clone());
            return Ok(entry.to_response(&key));
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    // The write is best-effort: the caller holds a valid
                    // network response either way.
                    if let Err(e) = self
                        .store
                        .put(&self.cache_name, &key, CachedEntry::from_response(&response))
                        .await
                    {
                        warn!("Cache write failed for {}: {}", key, e);
                    }
                }
                Ok(response)
            }
            Err(err) => {
                if request.is_navigation() {
                    debug!("Network failed for navigation {}: {}", key, err);
                    return self.offline_fallback().await;
                }
                // Uncategorized asset with no cache entry: nothing to fall
                // back to, the failure propagates.
                Err(err)
            }
        }
    }

    /// Serve the offline document from the current cache
    async fn offline_fallback(&self) -> PrecacheResult<Response> {
        match self.store.get(&self.cache_name, &self.offline_url).await? {
            Some(entry) => Ok(entry.to_response(&self.offline_url)),
            None => Err(PrecacheError::FallbackMissing(self.offline_url.clone())),
        }
    }

    /// Write an entry without blocking the caller
    fn store_in_background(&self, key: String, entry: CachedEntry) {
        let store = Arc::clone(&self.store);
        let cache_name = self.cache_name.clone();
        self.tasks.spawn(async move {
            if let Err(e) = store.put(&cache_name, &key, entry).await {
                warn!("Deferred cache write failed for {}: {}", key, e);
            }
        });
    }

    /// Refresh a served entry in the background
    ///
    /// Failures are swallowed: the caller already received a valid cached
    /// response. A stale entry is never evicted here; only a version bump
    /// retires content.
    fn revalidate_in_background(&self, request: Request, current: CachedEntry) {
        let store = Arc::clone(&self.store);
        let network = Arc::clone(&self.network);
        let cache_name = self.cache_name.clone();
        self.tasks.spawn(async move {
            let key = request.cache_key().to_string();
            match network.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    let changed = !current.same_content(&response);
                    let entry = CachedEntry::from_response(&response);
                    if let Err(e) = store.put(&cache_name, &key, entry).await {
                        warn!("Background refresh write failed for {}: {}", key, e);
                    } else if changed {
                        debug!("Background refresh updated {}", key);
                    }
                }
                Ok(response) => {
                    debug!(
                        "Background refresh for {} returned {}, keeping cached entry",
                        key, response.status
                    );
                }
                Err(e) => {
                    debug!("Background refresh failed for {}: {}", key, e);
                }
            }
        });
    }
}
