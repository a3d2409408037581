//! Sync Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A sync error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a sync failure.
///
/// Running out of retries on a single item is *not* an error; it's reported
/// as [`ItemOutcome::Failed`](crate::ItemOutcome::Failed) and the run carries
/// on. Only the failures below surface as `Err`.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Settings are missing or invalid; fix the configuration.
    #[display("invalid configuration: {_0}")]
    Configuration(#[error(not(source))] &'static str),
    /// The remote item list could not be fetched within the retry budget.
    #[display("remote service unavailable")]
    Unavailable,
    /// The remote item list was fetched but isn't in the expected format.
    #[display("could not decode remote items")]
    Decode,
    /// A request body could not be encoded.
    #[display("could not encode request")]
    Encode,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Configuration("sync.endpoint"), false)]
    #[case(ErrorKind::Unavailable, true)]
    #[case(ErrorKind::Decode, false)]
    #[case(ErrorKind::Encode, false)]
    fn error_kind_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::Configuration("sync.endpoint").to_string(),
            "invalid configuration: sync.endpoint"
        );
    }
}
