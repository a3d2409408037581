//! HTTP transport interface.
//!
//! lrkit never talks to the network itself; the host supplies something that
//! implements [`Transport`]. The orchestration layer wraps calls into it with
//! [`lrkit_retry`](https://docs.rs/lrkit-retry) and decodes the bodies.

pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod models;

#[cfg(feature = "mock")]
pub use crate::mock::MockTransport;
pub use crate::models::{Headers, Method, Request, Response};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type TransportHandle = Arc<dyn Transport + Send + Sync>;

/// Unified interface over whatever HTTP client the host provides.
///
/// Implementations return a [`Response`] for *any* status code; only failures
/// to obtain a response at all (network, timeout, bad URL) are errors.
///
/// # Examples
///
/// ```
/// use lrkit_transport::{Headers, Transport, error::Result};
///
/// async fn fetch_text(transport: &dyn Transport, url: &str) -> Result<Option<String>> {
///     let response = transport.get(url, &Headers::new()).await?;
///     if !response.is_success() {
///         return Ok(None);
///     }
///     Ok(Some(response.text()?.to_string()))
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name of the transport, used for logging only.
    fn name(&self) -> &str;

    /// Perform a `GET` request.
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response>;

    /// Send `body` with the given method (usually [`Method::Post`]).
    async fn post(&self, url: &str, body: &[u8], headers: &Headers, method: Method) -> Result<Response>;
}
