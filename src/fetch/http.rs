//! HTTP network backend
//!
//! Wraps a blocking `ureq` agent behind the tokio blocking pool. HTTP
//! error statuses are disabled on the agent so a 404 resolves as a
//! response rather than an error, matching browser fetch semantics.

use crate::error::{PrecacheError, PrecacheResult};
use crate::fetch::{Method, Network, Request, Response};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use ureq::Agent;

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Production network backend over HTTP(S)
#[derive(Clone)]
pub struct HttpNetwork {
    agent: Agent,
}

impl HttpNetwork {
    /// Create a backend with the default timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a backend with a custom global timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.new_agent(),
        }
    }
}

impl Default for HttpNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> PrecacheResult<Response> {
        let agent = self.agent.clone();
        let request = request.clone();

        tokio::task::spawn_blocking(move || fetch_blocking(&agent, &request))
            .await
            .map_err(|e| PrecacheError::Internal(format!("fetch task panicked: {}", e)))?
    }
}

fn fetch_blocking(agent: &Agent, request: &Request) -> PrecacheResult<Response> {
    let url = request.url.as_str();

    let result = match request.method {
        Method::Get | Method::Head => {
            let mut builder = if request.method == Method::Get {
                agent.get(url)
            } else {
                agent.head(url)
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        Method::Post => {
            let mut builder = agent.post(url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.send_empty()
        }
    };

    let mut raw = result.map_err(|e| PrecacheError::fetch(url, e.to_string()))?;

    let status = raw.status().as_u16();
    let mut headers = HashMap::new();
    for (name, value) in raw.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    let body = raw
        .body_mut()
        .read_to_vec()
        .map_err(|e| PrecacheError::fetch(url, e.to_string()))?;

    Ok(Response {
        url: url.to_string(),
        status,
        headers,
        body,
    })
}
