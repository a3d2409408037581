//! Selection filter: semicolon-delimited, literal substring patterns.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Separates individual patterns in a filter expression.
pub const DELIMITER: char = ';';

/// A set of literal substring patterns.
///
/// A name is selected when any pattern occurs in it verbatim (case-sensitive,
/// no wildcards). A filter without patterns selects everything.
///
/// # Examples
///
/// ```
/// use lrkit_matching::Filter;
///
/// let filter: Filter = "foo; bar ".parse().unwrap();
/// assert!(filter.matches("a foo b"));
/// assert!(filter.matches("barn"));
/// assert!(!filter.matches("Foo"));
///
/// assert!(Filter::default().matches("anything at all"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct Filter {
    patterns: Vec<String>,
}
impl Filter {
    /// Parse a filter expression. Patterns are trimmed of surrounding
    /// whitespace; patterns left empty after trimming are dropped.
    pub fn new(expression: &str) -> Self {
        let patterns = expression
            .split(DELIMITER)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        Self { patterns }
    }

    /// Same as [`Filter::new`], treating an absent expression as empty.
    pub fn from_optional(expression: Option<&str>) -> Self {
        expression.map(Self::new).unwrap_or_default()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// `true` if the filter selects every name.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.is_empty() || self.patterns.iter().any(|p| name.contains(p.as_str()))
    }
}
impl FromStr for Filter {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
impl From<String> for Filter {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}
impl From<Filter> for String {
    fn from(value: Filter) -> Self {
        value.to_string()
    }
}
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.patterns.join("; "))
    }
}
