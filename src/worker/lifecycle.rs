//! Worker lifecycle: install, activate, control messages
//!
//! `ServiceWorker` owns one cache generation. Install provisions the
//! versioned cache all-or-nothing; activate prunes superseded
//! generations and claims open pages; control messages adjust the
//! lifecycle out-of-band.

use crate::config::CacheConfig;
use crate::error::{PrecacheError, PrecacheResult};
use crate::fetch::{Network, Request};
use crate::store::{CacheStore, CachedEntry};
use crate::worker::clients::ClientRegistry;
use crate::worker::events::{ControlMessage, WorkerEvent};
use crate::worker::router::{FetchOutcome, Router};
use crate::worker::state::WorkerState;
use crate::worker::tasks::BackgroundTasks;
use futures_util::future::try_join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// A cache worker bound to one cache generation
pub struct ServiceWorker {
    config: CacheConfig,
    cache_name: String,
    store: Arc<dyn CacheStore>,
    network: Arc<dyn Network>,
    router: Router,
    clients: ClientRegistry,
    tasks: Arc<BackgroundTasks>,
    state: RwLock<WorkerState>,
    skip_waiting: AtomicBool,
}

impl ServiceWorker {
    /// Create a worker over the given store and network backends
    ///
    /// The configuration is validated here, so every running worker has a
    /// well-formed version, manifest, and fallback.
    pub fn new(
        config: CacheConfig,
        store: Arc<dyn CacheStore>,
        network: Arc<dyn Network>,
    ) -> PrecacheResult<Self> {
        config.validate()?;

        let origin = config.origin_url()?;
        let offline_url = config.asset_url(&config.offline_fallback)?.to_string();
        let cache_name = config.cache_name();
        let tasks = Arc::new(BackgroundTasks::new());

        let router = Router::new(
            cache_name.clone(),
            &origin,
            offline_url,
            Arc::clone(&store),
            Arc::clone(&network),
            Arc::clone(&tasks),
        );

        Ok(Self {
            config,
            cache_name,
            store,
            network,
            router,
            clients: ClientRegistry::new(),
            tasks,
            state: RwLock::new(WorkerState::New),
            skip_waiting: AtomicBool::new(false),
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        *self.state.read().expect("state lock poisoned")
    }

    fn set_state(&self, new_state: WorkerState) {
        *self.state.write().expect("state lock poisoned") = new_state;
    }

    /// The cache name this worker owns
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Registry of open pages
    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    /// Whether immediate activation was requested
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    /// Await all in-flight background cache work
    pub async fn settle(&self) {
        self.tasks.settle().await;
    }

    /// Deliver a runtime event
    ///
    /// Install and activate errors propagate to the host (which retries on
    /// a later event); message handling failures are logged only.
    pub async fn dispatch(&self, event: WorkerEvent) -> PrecacheResult<()> {
        match event {
            WorkerEvent::Install => self.install().await,
            WorkerEvent::Activate => self.activate().await,
            WorkerEvent::Message(message) => {
                self.handle_message(message).await;
                Ok(())
            }
        }
    }

    /// Route one intercepted request
    ///
    /// A worker that is not yet activated does not intercept; the host
    /// performs its default handling.
    pub async fn handle_fetch(&self, request: &Request) -> PrecacheResult<FetchOutcome> {
        if !self.state().can_intercept_fetch() {
            debug!("Worker is {}, not intercepting {}", self.state(), request.url);
            return Ok(FetchOutcome::NotIntercepted);
        }
        self.router.route(request).await
    }

    /// Provision the versioned cache with every manifest asset
    ///
    /// All-or-nothing: any unreachable asset aborts the install and no
    /// partial cache is published. On success the worker requests
    /// immediate activation rather than waiting for open pages to close.
    pub async fn install(&self) -> PrecacheResult<()> {
        let state = self.state();
        if !matches!(state, WorkerState::New | WorkerState::Failed) {
            return Err(PrecacheError::InvalidState {
                expected: "new or failed".to_string(),
                actual: state.to_string(),
            });
        }

        info!(
            "Installing cache worker {} ({} manifest assets)",
            self.cache_name,
            self.config.critical_assets.len()
        );
        self.set_state(WorkerState::Installing);

        match self.provision().await {
            Ok(count) => {
                self.set_state(WorkerState::Installed);
                // Fast rollout over strict version isolation across tabs.
                self.skip_waiting.store(true, Ordering::SeqCst);
                info!("Install complete: {} assets cached in {}", count, self.cache_name);
                Ok(())
            }
            Err(e) => {
                self.set_state(WorkerState::Failed);
                Err(e)
            }
        }
    }

    /// Promote this generation: prune stale caches and claim open pages
    ///
    /// Enumeration or deletion failures are logged and do not block the
    /// claim; stale caches linger until the next successful activation.
    pub async fn activate(&self) -> PrecacheResult<()> {
        let state = self.state();
        if state != WorkerState::Installed {
            return Err(PrecacheError::InvalidState {
                expected: "installed".to_string(),
                actual: state.to_string(),
            });
        }

        info!("Activating cache worker {}", self.cache_name);
        self.set_state(WorkerState::Activating);

        match self.store.cache_names().await {
            Ok(names) => {
                for name in names.iter().filter(|n| **n != self.cache_name) {
                    match self.store.delete_cache(name).await {
                        Ok(_) => info!("Deleted stale cache: {}", name),
                        Err(e) => warn!("Failed to delete stale cache {}: {}", name, e),
                    }
                }
            }
            Err(e) => warn!("Could not enumerate caches: {}", e),
        }

        let claimed = self.clients.claim();
        self.set_state(WorkerState::Activated);
        info!(
            "Cache worker {} active, controlling {} pages",
            self.cache_name, claimed
        );
        Ok(())
    }

    /// Handle a control message from a page
    ///
    /// Fire-and-forget: failures are logged, never surfaced to the page.
    pub async fn handle_message(&self, message: ControlMessage) {
        match message {
            ControlMessage::SkipWaiting => {
                self.skip_waiting.store(true, Ordering::SeqCst);
                if self.state() == WorkerState::Installed {
                    if let Err(e) = self.activate().await {
                        warn!("Forced activation failed: {}", e);
                    }
                } else {
                    debug!("Skip-waiting noted while {}", self.state());
                }
            }
            ControlMessage::CacheUpdate => {
                if let Err(e) = self.refresh_manifest().await {
                    warn!("Manifest refresh failed: {}", e);
                }
            }
        }
    }

    /// Parse and handle a raw JSON message from a page
    pub async fn post_message(&self, raw: &str) {
        match ControlMessage::from_json(raw) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => warn!("Ignoring malformed control message: {}", e),
        }
    }

    /// Re-fetch and re-store the whole manifest into the current cache
    ///
    /// Recovery path for partial or corrupted cache state; unlike install
    /// it never deletes the cache on failure.
    async fn refresh_manifest(&self) -> PrecacheResult<()> {
        let entries = self.fetch_manifest().await?;
        let count = entries.len();
        for (key, entry) in entries {
            self.store.put(&self.cache_name, &key, entry).await?;
        }
        info!("Refreshed {} manifest assets in {}", count, self.cache_name);
        Ok(())
    }

    /// Fetch every manifest asset concurrently
    ///
    /// Any transport failure or non-2xx status fails the whole batch.
    async fn fetch_manifest(&self) -> PrecacheResult<Vec<(String, CachedEntry)>> {
        let mut targets = Vec::with_capacity(self.config.critical_assets.len());
        for path in &self.config.critical_assets {
            targets.push((path.clone(), self.config.asset_url(path)?));
        }

        let fetches = targets.into_iter().map(|(path, url)| {
            let network = Arc::clone(&self.network);
            async move {
                let request = Request::get(url);
                let response = network
                    .fetch(&request)
                    .await
                    .map_err(|e| PrecacheError::manifest(&path, e.to_string()))?;
                if !response.is_success() {
                    return Err(PrecacheError::manifest(
                        &path,
                        format!("status {}", response.status),
                    ));
                }
                Ok((
                    request.cache_key().to_string(),
                    CachedEntry::from_response(&response),
                ))
            }
        });

        try_join_all(fetches).await
    }

    /// Fetch the manifest and publish it into the versioned cache
    async fn provision(&self) -> PrecacheResult<usize> {
        let entries = self.fetch_manifest().await?;

        let existed = self
            .store
            .cache_names()
            .await?
            .contains(&self.cache_name);
        self.store.open(&self.cache_name).await?;

        let count = entries.len();
        for (key, entry) in entries {
            if let Err(e) = self.store.put(&self.cache_name, &key, entry).await {
                // A half-written generation must never become observable.
                if !existed {
                    let _ = self.store.delete_cache(&self.cache_name).await;
                }
                return Err(e);
            }
        }
        Ok(count)
    }
}
