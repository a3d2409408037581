//! Normalized name similarity.

use crate::distance::distance;

/// Lowercase `name` and strip every whitespace character, hyphen and
/// underscore, wherever they occur.
///
/// ```
/// use lrkit_matching::normalize;
/// assert_eq!(normalize("  My Summer-Trip_2024 "), "mysummertrip2024");
/// ```
pub fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect()
}

/// Similarity of two names in `[0.0, 1.0]`.
///
/// Both names are [normalized](normalize) first. Identical normalized forms
/// (including two empty ones) score exactly `1.0`; otherwise the score is
/// `1 - distance / longest`, where `longest` is the larger normalized length
/// in characters.
///
/// ```
/// use lrkit_matching::similarity;
/// assert_eq!(similarity("Foo_Bar", "foobar"), 1.0);
/// assert!((similarity("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-9);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a == b {
        return 1.0;
    }
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    let score = 1.0 - distance(&a, &b) as f64 / longest as f64;
    score.clamp(0.0, 1.0)
}
