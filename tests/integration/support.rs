//! Shared fixtures: a scriptable network and worker builders

use async_trait::async_trait;
use precache::config::CacheConfig;
use precache::error::{PrecacheError, PrecacheResult};
use precache::fetch::{Network, Request, Response};
use precache::store::{CacheStore, MemoryStore};
use precache::worker::ServiceWorker;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Scriptable network: per-URL responses, an offline switch, hit counts
pub struct FakeNetwork {
    responses: Mutex<HashMap<String, Response>>,
    hits: Mutex<HashMap<String, usize>>,
    offline: AtomicBool,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            hits: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn serve(&self, url: &str, status: u16, body: &[u8]) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Response::new(url, status, body.to_vec()));
    }

    pub fn drop_path(&self, url: &str) {
        self.responses.lock().unwrap().remove(url);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// How many times a URL was actually fetched over the network
    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &Request) -> PrecacheResult<Response> {
        let url = request.cache_key().to_string();
        *self.hits.lock().unwrap().entry(url.clone()).or_insert(0) += 1;

        if self.offline.load(Ordering::SeqCst) {
            return Err(PrecacheError::fetch(url, "simulated offline"));
        }
        self.responses
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .ok_or_else(|| PrecacheError::fetch(url, "no route to host"))
    }
}

/// Manifest used across the tests
pub fn test_config(version: &str) -> CacheConfig {
    CacheConfig {
        namespace: "ns".to_string(),
        version: version.to_string(),
        origin: "https://example.com".to_string(),
        critical_assets: vec![
            "/".to_string(),
            "/index.html".to_string(),
            "/offline.html".to_string(),
        ],
        offline_fallback: "/offline.html".to_string(),
    }
}

/// Serve every asset of `test_config` over the fake network
pub fn serve_manifest(network: &FakeNetwork) {
    network.serve("https://example.com/", 200, b"<html>root</html>");
    network.serve("https://example.com/index.html", 200, b"<html>index</html>");
    network.serve("https://example.com/offline.html", 200, b"<html>offline</html>");
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub network: Arc<FakeNetwork>,
}

impl Fixture {
    pub fn new() -> Self {
        // Honors RUST_LOG, e.g. `RUST_LOG=precache=debug cargo test`
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        Self {
            store: Arc::new(MemoryStore::new()),
            network: Arc::new(FakeNetwork::new()),
        }
    }

    /// Build a worker for this fixture's store and network
    pub fn worker(&self, version: &str) -> ServiceWorker {
        ServiceWorker::new(
            test_config(version),
            Arc::clone(&self.store) as Arc<dyn CacheStore>,
            Arc::clone(&self.network) as Arc<dyn Network>,
        )
        .unwrap()
    }

    /// Build a worker and run it through install and activate
    pub async fn running_worker(&self, version: &str) -> ServiceWorker {
        let worker = self.worker(version);
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        worker
    }
}
