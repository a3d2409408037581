//! Read-only view of the host's collections.

use std::collections::BTreeMap;

/// The host's collections, keyed by name.
///
/// Records are opaque to the sync: it only ever looks names up and lists
/// them for fuzzy matching.
pub trait Catalog: Send + Sync {
    type Record: Send + Sync;

    /// Exact (case-sensitive) lookup by collection name.
    fn get(&self, name: &str) -> Option<&Self::Record>;

    /// Every collection name, in a stable order.
    fn names(&self) -> Vec<&str>;

    fn len(&self) -> usize {
        self.names().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [`Catalog`] held entirely in memory.
///
/// ```
/// use lrkit_sync::{Catalog, MemoryCatalog};
///
/// let catalog = MemoryCatalog::from_iter([("Summer Trip", 1), ("Wedding", 2)]);
/// assert_eq!(catalog.get("Wedding"), Some(&2));
/// assert_eq!(catalog.names(), ["Summer Trip", "Wedding"]);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryCatalog<R> {
    records: BTreeMap<String, R>,
}
impl<R> MemoryCatalog<R> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, record: R) -> Option<R> {
        self.records.insert(name.into(), record)
    }
}
impl<R> Default for MemoryCatalog<R> {
    fn default() -> Self {
        Self::new()
    }
}
impl<N: Into<String>, R> FromIterator<(N, R)> for MemoryCatalog<R> {
    fn from_iter<I: IntoIterator<Item = (N, R)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|(name, record)| (name.into(), record)).collect(),
        }
    }
}

impl<R: Send + Sync> Catalog for MemoryCatalog<R> {
    type Record = R;

    fn get(&self, name: &str) -> Option<&R> {
        self.records.get(name)
    }

    fn names(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_sensitive() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert("Wedding", ());
        assert!(catalog.get("Wedding").is_some());
        assert!(catalog.get("wedding").is_none());
    }

    #[test]
    fn names_are_sorted() {
        let catalog = MemoryCatalog::from_iter([("b", 0), ("a", 0), ("c", 0)]);
        assert_eq!(catalog.names(), ["a", "b", "c"]);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        assert!(MemoryCatalog::<()>::default().is_empty());
    }
}
