//! Fuzzy reconciliation of a name against a set of candidates.

use crate::error::{ErrorKind, Result};
use crate::similarity::similarity;
use tracing::instrument;

/// Candidate selected by [`FuzzyMatcher::best_match`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub candidate: &'a str,
    /// Similarity in `[threshold, 1.0]`.
    pub score: f64,
}

/// Picks the most similar candidate for a name, provided it scores at least
/// the configured threshold.
///
/// ```
/// use lrkit_matching::FuzzyMatcher;
///
/// let matcher = FuzzyMatcher::new(0.8).unwrap();
/// let collections = ["Summer Trip", "Winter Trip", "Wedding"];
/// let found = matcher.best_match("summer-trip", collections).unwrap();
/// assert_eq!(found.candidate, "Summer Trip");
/// assert_eq!(found.score, 1.0);
///
/// assert!(matcher.best_match("Birthday", collections).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}
impl FuzzyMatcher {
    pub const DEFAULT_THRESHOLD: f64 = 0.8;

    /// Fails with [`ErrorKind::InvalidThreshold`] unless `threshold` is a
    /// finite number within `[0.0, 1.0]`.
    pub fn new(threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            exn::bail!(ErrorKind::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// `true` if `a` and `b` are similar enough to be considered the same name.
    pub fn is_match(&self, a: &str, b: &str) -> bool {
        similarity(a, b) >= self.threshold
    }

    /// Returns the best scoring candidate at or above the threshold.
    ///
    /// A verbatim match short-circuits with a score of `1.0`. Among equal
    /// scores the earliest candidate wins.
    #[instrument(level = "trace", skip(self, candidates))]
    pub fn best_match<'a, I>(&self, needle: &str, candidates: I) -> Option<Match<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut best: Option<Match<'a>> = None;
        for candidate in candidates {
            if candidate == needle {
                return Some(Match { candidate, score: 1.0 });
            }
            let score = similarity(needle, candidate);
            if score < self.threshold {
                continue;
            }
            if best.is_none_or(|b| score > b.score) {
                best = Some(Match { candidate, score });
            }
        }
        best
    }
}
impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-0.1)]
    #[case(1.01)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_out_of_range_threshold(#[case] threshold: f64) {
        let err = FuzzyMatcher::new(threshold).unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidThreshold(_)));
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(1.0)]
    fn accepts_threshold_in_range(#[case] threshold: f64) {
        assert_eq!(FuzzyMatcher::new(threshold).unwrap().threshold(), threshold);
    }

    #[test]
    fn verbatim_match_wins_immediately() {
        let matcher = FuzzyMatcher::new(0.5).unwrap();
        // "trip" also normalizes to a perfect score, but the verbatim name is preferred.
        let found = matcher.best_match("Trip", ["trip", "Trip"]).unwrap();
        assert_eq!(found.candidate, "Trip");
        assert_eq!(found.score, 1.0);

        let found = matcher.best_match("Trip", ["trip", "Trips"]).unwrap();
        assert_eq!(found.candidate, "trip");
    }

    #[test]
    fn picks_highest_score() {
        let matcher = FuzzyMatcher::new(0.5).unwrap();
        let found = matcher.best_match("kitten", ["sitting", "mitten", "kitchen"]).unwrap();
        assert_eq!(found.candidate, "mitten");
        assert!((found.score - (1.0 - 1.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_first_candidate() {
        let matcher = FuzzyMatcher::new(0.5).unwrap();
        let found = matcher.best_match("abcd", ["abcx", "abcy"]).unwrap();
        assert_eq!(found.candidate, "abcx");
    }

    #[test]
    fn nothing_above_threshold() {
        let matcher = FuzzyMatcher::new(0.9).unwrap();
        assert!(matcher.best_match("kitten", ["sitting"]).is_none());
        assert!(matcher.best_match("kitten", std::iter::empty()).is_none());
    }

    #[test]
    fn default_threshold() {
        let matcher = FuzzyMatcher::default();
        assert_eq!(matcher.threshold(), 0.8);
        assert!(matcher.is_match("Family Photos", "family_photo"));
        assert!(!matcher.is_match("Family", "Friends"));
    }
}
