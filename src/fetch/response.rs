//! Fetch response

use std::collections::HashMap;

/// A resolved network response
///
/// Transport failures never produce a `Response`; they surface as
/// `PrecacheError::Fetch`. HTTP error statuses (404, 500) are ordinary
/// responses, matching browser fetch semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URL the response was fetched from
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers (name -> value)
    pub headers: HashMap<String, String>,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Create a response with a status and body
    pub fn new(url: impl Into<String>, status: u16, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Whether the status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body interpreted as UTF-8, lossily
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
