//! Worker events and the page-facing control messages
//!
//! Events make the dispatch table explicit: the host runtime constructs a
//! `WorkerEvent` and hands it to `ServiceWorker::dispatch`, instead of the
//! worker hanging behavior off ambient listeners.

use crate::error::PrecacheResult;
use serde::{Deserialize, Serialize};

/// Out-of-band command posted by a page
///
/// Wire format is JSON: `{"type": "SKIP_WAITING"}` or
/// `{"type": "CACHE_UPDATE"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Skip the waiting phase and activate immediately
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    /// Re-fetch and re-store the whole asset manifest
    #[serde(rename = "CACHE_UPDATE")]
    CacheUpdate,
}

impl ControlMessage {
    /// Parse a message from its JSON wire form
    pub fn from_json(raw: &str) -> PrecacheResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// A runtime event delivered to the worker
///
/// Fetch interception is not an event variant: it produces a value and is
/// dispatched through `ServiceWorker::handle_fetch`.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Provision the versioned cache with the asset manifest
    Install,
    /// Prune stale generations and claim open pages
    Activate,
    /// A control message arrived from a page
    Message(ControlMessage),
}
