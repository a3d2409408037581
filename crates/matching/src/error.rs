//! Matching Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A matching error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for matching operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ErrorKind {
    /// A similarity threshold outside `[0.0, 1.0]` (or not a number at all).
    #[display("similarity threshold must be within 0.0..=1.0, found: {_0}")]
    InvalidThreshold(#[error(not(source))] f64),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Matching is pure; the same input always gives the same answer.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::InvalidThreshold(1.5).to_string(),
            "similarity threshold must be within 0.0..=1.0, found: 1.5"
        );
        assert!(!ErrorKind::InvalidThreshold(-1.0).is_retryable());
    }
}
