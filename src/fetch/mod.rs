//! Fetch types and the network boundary
//!
//! `Network` is the seam between the routing policy and the outside
//! world. The production backend is `HttpNetwork`; tests inject a
//! scriptable fake.

mod http;
mod request;
mod response;

pub use http::HttpNetwork;
pub use request::{Method, Request, RequestMode};
pub use response::Response;

use crate::error::PrecacheResult;
use async_trait::async_trait;

/// Abstract network interface
///
/// Implementations must treat transport failures (offline, DNS, timeout)
/// as errors and resolve HTTP error statuses as ordinary responses.
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform the request and return the resolved response
    async fn fetch(&self, request: &Request) -> PrecacheResult<Response>;
}
