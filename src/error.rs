//! Error types for precache
//!
//! All modules use `PrecacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for precache operations
pub type PrecacheResult<T> = Result<T, PrecacheError>;

/// All errors that can occur in precache
#[derive(Error, Debug)]
pub enum PrecacheError {
    // Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigInvalid { reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Request errors
    #[error("Invalid URL '{url}': {reason}")]
    UrlInvalid { url: String, reason: String },

    // Network errors
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    // Install / manifest errors
    #[error("Manifest asset {path} could not be cached: {reason}")]
    ManifestAsset { path: String, reason: String },

    // Cache store errors
    #[error("Cache store error: {0}")]
    Store(String),

    #[error("Offline fallback {0} missing from cache")]
    FallbackMissing(String),

    // Lifecycle errors
    #[error("Worker is {actual}, expected {expected}")]
    InvalidState { expected: String, actual: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PrecacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a fetch error for a URL
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a manifest asset error
    pub fn manifest(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ManifestAsset {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    ///
    /// Install failures are fatal to that attempt but the host runtime is
    /// expected to retry installation on a later event, so transport and
    /// manifest errors classify as retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::ManifestAsset { .. })
    }
}
