//! Levenshtein edit distance.

/// Minimum number of single-character insertions, deletions or substitutions
/// required to turn `a` into `b`.
///
/// Operates on Unicode scalar values rather than bytes, so `"é"` and `"e"`
/// are one substitution apart. Only two rows of the DP table are kept alive
/// (the shorter input is used for the row width), which gives the same result
/// as the full `(m+1)×(n+1)` table in `O(min(m, n))` space.
///
/// Intended for short identifiers such as collection names. Time is still
/// `O(m·n)`: don't feed it whole documents.
///
/// ```
/// use lrkit_matching::distance;
/// assert_eq!(distance("kitten", "sitting"), 3);
/// assert_eq!(distance("", "abc"), 3);
/// assert_eq!(distance("same", "same"), 0);
/// ```
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    // Distance is symmetric; iterate over the longer one so the rows are short.
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut previous: Vec<usize> = (0..=short.len()).collect();
    let mut current = vec![0usize; short.len() + 1];
    for (i, lc) in long.iter().enumerate() {
        current[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitution = previous[j] + usize::from(lc != sc);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[short.len()]
}
