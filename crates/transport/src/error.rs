//! Transport Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A transport error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// A response with a non-2xx status is *not* an error at this layer; callers
/// inspect [`Response::status`](crate::Response::status) themselves.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection refused, reset, DNS failure, TLS failure...
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// No response within the transport's deadline.
    #[display("request timed out")]
    Timeout,
    /// The URL could not be parsed or is not supported by the transport.
    #[display("invalid URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// Response body was expected to be text but wasn't valid UTF-8.
    #[display("response body is not valid UTF-8")]
    InvalidBody,
    /// A mock transport received a request it had no scripted answer for.
    #[display("no response scripted for {_0}")]
    Unscripted(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}
