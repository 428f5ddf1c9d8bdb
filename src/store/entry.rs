//! Cached response entry

use crate::fetch::Response;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// One cached response, keyed by request URL in its owning cache
///
/// Entries track when they were stored and a body checksum so a
/// background refresh can report whether content actually changed.
/// There is no per-entry expiry: staleness is managed at cache-version
/// granularity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    /// HTTP status of the stored response
    pub status: u16,
    /// Stored response headers
    pub headers: HashMap<String, String>,
    /// Stored response body
    pub body: Vec<u8>,
    /// When this entry was written
    pub stored_at: DateTime<Utc>,
    /// Short SHA-256 checksum of the body
    pub checksum: String,
}

impl CachedEntry {
    /// Snapshot a response into a cache entry
    pub fn from_response(response: &Response) -> Self {
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body: response.body.clone(),
            stored_at: Utc::now(),
            checksum: body_checksum(&response.body),
        }
    }

    /// Rehydrate the entry as a response for the given URL
    pub fn to_response(&self, url: &str) -> Response {
        Response {
            url: url.to_string(),
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// Whether the given response carries the same body as this entry
    pub fn same_content(&self, response: &Response) -> bool {
        self.checksum == body_checksum(&response.body)
    }
}

/// Short hex SHA-256 over a response body
pub fn body_checksum(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}
