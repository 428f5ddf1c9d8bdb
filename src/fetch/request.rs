//! Intercepted request descriptor
//!
//! A `Request` carries everything the routing policy looks at: the URL
//! (origin comparison), the `Accept` header (document detection), and the
//! request mode (navigation fallback).

use crate::error::{PrecacheError, PrecacheResult};
use std::collections::HashMap;
use std::fmt;
use url::Url;

/// HTTP method. The routing policy only ever caches GET responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Head => write!(f, "HEAD"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// How the request was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Top-level document navigation
    Navigate,
    /// Subresource load (scripts, styles, images, fonts)
    NoCors,
    /// Cross-origin capable subresource load
    Cors,
}

/// An outbound request intercepted by the worker
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub method: Method,
    pub mode: RequestMode,
    pub headers: HashMap<String, String>,
}

impl Request {
    /// Create a plain GET subresource request
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: Method::Get,
            mode: RequestMode::NoCors,
            headers: HashMap::new(),
        }
    }

    /// Create a top-level navigation request for an HTML document
    pub fn navigate(url: Url) -> Self {
        let mut req = Self::get(url);
        req.mode = RequestMode::Navigate;
        req.headers.insert(
            "Accept".to_string(),
            "text/html,application/xhtml+xml".to_string(),
        );
        req
    }

    /// Create a cross-origin capable GET subresource request
    pub fn cors(url: Url) -> Self {
        let mut req = Self::get(url);
        req.mode = RequestMode::Cors;
        req
    }

    /// Parse a GET request from a URL string
    pub fn parse(url: &str) -> PrecacheResult<Self> {
        let parsed = Url::parse(url).map_err(|e| PrecacheError::UrlInvalid {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::get(parsed))
    }

    /// Set a header, consuming and returning the request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the `Accept` header indicates an HTML document
    pub fn accepts_html(&self) -> bool {
        self.header("accept")
            .map(|v| v.contains("text/html"))
            .unwrap_or(false)
    }

    /// Whether this is a top-level navigation
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// The key this request is cached under
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }
}
