//! Configuration schema for the cache engine
//!
//! One `CacheConfig` value describes a single cache generation: the
//! version, the manifest of critical assets, and the offline fallback.
//! Instances are independent, so tests can run several workers with
//! different versions side by side without shared state.

use crate::error::{PrecacheError, PrecacheResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Configuration for one cache generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache namespace, the prefix of every cache name
    pub namespace: String,

    /// Cache version, e.g. "v2.1.0". Bumping it retires all previously
    /// cached assets on the next activation.
    pub version: String,

    /// Site origin. Requests to any other origin are not intercepted.
    pub origin: String,

    /// Asset paths fetched eagerly at install. Order is preserved;
    /// duplicates are a validation error.
    pub critical_assets: Vec<String>,

    /// Document served when both network and cache miss for a navigation
    /// request. Must be listed in `critical_assets`.
    pub offline_fallback: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: "precache".to_string(),
            version: "v1.0.0".to_string(),
            origin: "http://localhost:8080".to_string(),
            critical_assets: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/offline.html".to_string(),
            ],
            offline_fallback: "/offline.html".to_string(),
        }
    }
}

impl CacheConfig {
    /// Derived cache name: `<namespace>-<version>`
    pub fn cache_name(&self) -> String {
        format!("{}-{}", self.namespace, self.version)
    }

    /// Parse the configured origin into a URL
    pub fn origin_url(&self) -> PrecacheResult<Url> {
        let url = Url::parse(&self.origin).map_err(|e| PrecacheError::UrlInvalid {
            url: self.origin.clone(),
            reason: e.to_string(),
        })?;
        if !url.has_host() {
            return Err(PrecacheError::UrlInvalid {
                url: self.origin.clone(),
                reason: "origin has no host".to_string(),
            });
        }
        Ok(url)
    }

    /// Resolve an asset path against the site origin
    pub fn asset_url(&self, path: &str) -> PrecacheResult<Url> {
        self.origin_url()?
            .join(path)
            .map_err(|e| PrecacheError::UrlInvalid {
                url: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// Validate the configuration
    ///
    /// Checks version syntax (semver after an optional leading `v`),
    /// origin syntax, asset path shape and uniqueness, and that the
    /// offline fallback is part of the manifest.
    pub fn validate(&self) -> PrecacheResult<()> {
        if self.namespace.is_empty() || self.namespace.contains(char::is_whitespace) {
            return Err(PrecacheError::ConfigInvalid {
                reason: format!("invalid namespace '{}'", self.namespace),
            });
        }

        let bare = self.version.strip_prefix('v').unwrap_or(&self.version);
        semver::Version::parse(bare).map_err(|e| PrecacheError::ConfigInvalid {
            reason: format!("invalid cache version '{}': {}", self.version, e),
        })?;

        self.origin_url()?;

        if self.critical_assets.is_empty() {
            return Err(PrecacheError::ConfigInvalid {
                reason: "critical_assets is empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for path in &self.critical_assets {
            if !path.starts_with('/') {
                return Err(PrecacheError::ConfigInvalid {
                    reason: format!("asset path '{}' must start with '/'", path),
                });
            }
            if !seen.insert(path.as_str()) {
                return Err(PrecacheError::ConfigInvalid {
                    reason: format!("duplicate asset path '{}'", path),
                });
            }
        }

        // The fallback can only ever be served from cache, so it has to be
        // provisioned at install time.
        if !self.critical_assets.contains(&self.offline_fallback) {
            return Err(PrecacheError::ConfigInvalid {
                reason: format!(
                    "offline fallback '{}' is not listed in critical_assets",
                    self.offline_fallback
                ),
            });
        }

        Ok(())
    }
}
