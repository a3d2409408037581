//! Name matching primitives.
//!
//! Two independent strategies are available to callers:
//!
//! - [`Filter`]: plain-text, case-sensitive containment of any of a set of
//!   semicolon-delimited patterns. Used for exact selection.
//! - [`similarity`] / [`FuzzyMatcher`]: edit distance over normalized names,
//!   scored into `[0.0, 1.0]`. Used to reconcile names that differ only in
//!   case, spacing, punctuation or the odd typo.
//!
//! ```
//! use lrkit_matching::{Filter, similarity};
//!
//! let filter: Filter = "Trip; Wedding".parse().unwrap();
//! assert!(filter.matches("Summer Trip 2024"));
//! assert!(!filter.matches("summer trip 2024"));
//!
//! assert_eq!(similarity("My Collection", "my-collection"), 1.0);
//! ```

mod distance;
pub mod error;
mod filter;
mod fuzzy;
mod similarity;

pub use crate::distance::distance;
pub use crate::filter::{DELIMITER, Filter};
pub use crate::fuzzy::{FuzzyMatcher, Match};
pub use crate::similarity::{normalize, similarity};
