//! End-to-end lifecycle scenarios

use crate::support::{serve_manifest, Fixture};
use precache::fetch::{Request, Response};
use precache::store::{CacheStore, CachedEntry};
use precache::worker::WorkerState;
use url::Url;

// Fresh deploy: install caches the manifest, activation finds nothing to
// prune, and a fetch is served from the provisioned cache.
#[tokio::test]
async fn fresh_install_serves_from_cache() {
    let fixture = Fixture::new();
    serve_manifest(&fixture.network);

    let worker = fixture.worker("v1.0.0");
    worker.install().await.unwrap();
    assert_eq!(fixture.store.entry_keys("ns-v1.0.0").await.unwrap().len(), 3);

    worker.activate().await.unwrap();
    assert_eq!(
        fixture.store.cache_names().await.unwrap(),
        vec!["ns-v1.0.0"]
    );

    let response = worker
        .handle_fetch(&Request::parse("https://example.com/index.html").unwrap())
        .await
        .unwrap()
        .into_response()
        .unwrap();
    assert_eq!(response.body, b"<html>index</html>");
}

// Version bump: the old generation holds five entries, the new manifest
// has three; after activation the store holds only the new generation.
#[tokio::test]
async fn version_bump_retires_old_generation() {
    let fixture = Fixture::new();
    serve_manifest(&fixture.network);

    for i in 0..5 {
        let url = format!("https://example.com/old-{}.css", i);
        fixture
            .store
            .put(
                "ns-v1.0.0",
                &url,
                CachedEntry::from_response(&Response::new(&url, 200, b"old".to_vec())),
            )
            .await
            .unwrap();
    }

    let worker = fixture.worker("v2.0.0");
    worker.install().await.unwrap();
    worker.activate().await.unwrap();

    assert_eq!(
        fixture.store.cache_names().await.unwrap(),
        vec!["ns-v2.0.0"]
    );
    assert_eq!(fixture.store.entry_keys("ns-v2.0.0").await.unwrap().len(), 3);
}

// Offline first visit to an unseen document: the visitor gets the offline
// page, not a network error.
#[tokio::test]
async fn offline_navigation_shows_fallback_document() {
    let fixture = Fixture::new();
    serve_manifest(&fixture.network);
    let worker = fixture.running_worker("v1.0.0").await;

    fixture.network.set_offline(true);

    let response = worker
        .handle_fetch(&Request::navigate(
            Url::parse("https://example.com/about.html").unwrap(),
        ))
        .await
        .unwrap()
        .into_response()
        .unwrap();
    assert_eq!(response.body, b"<html>offline</html>");
}

// Rolling upgrade driven by the page: a new worker installs alongside the
// running one, the page posts SKIP_WAITING, and the new generation takes
// over with the old cache gone.
#[tokio::test]
async fn page_driven_upgrade() {
    let fixture = Fixture::new();
    serve_manifest(&fixture.network);

    let old_worker = fixture.running_worker("v1.0.0").await;
    let page = old_worker.clients().register("https://example.com/");
    assert!(!old_worker.clients().is_controlled(page));
    old_worker.clients().claim();

    // New deploy with changed content
    fixture
        .network
        .serve("https://example.com/index.html", 200, b"<html>v2</html>");
    let new_worker = fixture.worker("v2.0.0");
    new_worker.install().await.unwrap();
    assert_eq!(new_worker.state(), WorkerState::Installed);

    new_worker.post_message(r#"{"type": "SKIP_WAITING"}"#).await;
    assert_eq!(new_worker.state(), WorkerState::Activated);

    assert_eq!(
        fixture.store.cache_names().await.unwrap(),
        vec!["ns-v2.0.0"]
    );

    let response = new_worker
        .handle_fetch(&Request::parse("https://example.com/index.html").unwrap())
        .await
        .unwrap()
        .into_response()
        .unwrap();
    assert_eq!(response.body, b"<html>v2</html>");
}

// CACHE_UPDATE recovers a corrupted cache without a version bump.
#[tokio::test]
async fn cache_update_recovers_missing_entries() {
    let fixture = Fixture::new();
    serve_manifest(&fixture.network);
    let worker = fixture.running_worker("v1.0.0").await;

    fixture
        .store
        .delete("ns-v1.0.0", "https://example.com/")
        .await
        .unwrap();
    assert_eq!(fixture.store.entry_keys("ns-v1.0.0").await.unwrap().len(), 2);

    worker.post_message(r#"{"type": "CACHE_UPDATE"}"#).await;

    assert_eq!(fixture.store.entry_keys("ns-v1.0.0").await.unwrap().len(), 3);
}
