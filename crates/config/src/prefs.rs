//! Named preference values with implicit defaults.
//!
//! Preferences are what a host dialog would edit between runs (the last
//! filter typed, whether dry-run was ticked). They're a flat map of JSON
//! values, optionally persisted to a JSON file.

use crate::Config;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const KEY_FILTER: &str = "matching.filter";
pub const KEY_THRESHOLD: &str = "matching.threshold";
pub const KEY_DRY_RUN: &str = "sync.dry_run";

/// Named preference store.
///
/// Reading a key that was never written stores the supplied default, so the
/// value seen on first access sticks for later reads (and is persisted by the
/// next [`save`](Self::save)).
///
/// ```
/// use lrkit_config::Preferences;
///
/// let mut prefs = Preferences::in_memory();
/// assert_eq!(prefs.get_or_init("retries", || 2u32).unwrap(), 2);
/// assert_eq!(prefs.get_or_init("retries", || 9u32).unwrap(), 2);
///
/// prefs.set("retries", 5u32).unwrap();
/// assert_eq!(prefs.get::<u32>("retries").unwrap(), Some(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    values: BTreeMap<String, Value>,
    path: Option<PathBuf>,
}
impl Preferences {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store backed by `path`. A missing file is an empty store;
    /// it's created on the first [`save`](Self::save).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let raw = std::fs::read(&path).or_raise(|| ErrorKind::Io)?;
            serde_json::from_slice(&raw).or_raise(|| ErrorKind::Io)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            values,
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The stored value, if any, without defaulting.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.values
            .get(key)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .or_raise(|| ErrorKind::Preference(key.to_string()))
    }

    /// The stored value, or `default()` which is stored first.
    pub fn get_or_init<T, F>(&mut self, key: &str, default: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get(key)? {
            return Ok(value);
        }
        let value = default();
        self.set(key, &value)?;
        tracing::debug!(key, "Preference initialised with default");
        Ok(value)
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value).or_raise(|| ErrorKind::Preference(key.to_string()))?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Persist to the backing file. A no-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
        }
        let raw = serde_json::to_vec_pretty(&self.values).or_raise(|| ErrorKind::Io)?;
        std::fs::write(path, raw).or_raise(|| ErrorKind::Io)?;
        Ok(())
    }

    /// Let user preferences override the run-time settings of `config`.
    ///
    /// Keys that have never been set are initialised from `config`, so the
    /// first run records the configured values as the user's preferences.
    pub fn overlay(&mut self, config: &mut Config) -> Result<()> {
        config.matching.filter = self.get_or_init(KEY_FILTER, || config.matching.filter.clone())?;
        config.matching.threshold = self.get_or_init(KEY_THRESHOLD, || config.matching.threshold)?;
        config.sync.dry_run = self.get_or_init(KEY_DRY_RUN, || config.sync.dry_run)?;
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrkit_matching::Filter;
    use std::ops::Deref;

    #[test]
    fn first_access_stores_default() {
        let mut prefs = Preferences::in_memory();
        assert!(!prefs.contains("filter"));
        assert_eq!(prefs.get_or_init("filter", || "Trip".to_string()).unwrap(), "Trip");
        assert!(prefs.contains("filter"));
        assert_eq!(prefs.get_or_init("filter", || "Other".to_string()).unwrap(), "Trip");
    }

    #[test]
    fn set_overrides_and_remove_clears() {
        let mut prefs = Preferences::in_memory();
        prefs.set("dry_run", true).unwrap();
        assert_eq!(prefs.get::<bool>("dry_run").unwrap(), Some(true));
        assert!(prefs.remove("dry_run"));
        assert_eq!(prefs.get::<bool>("dry_run").unwrap(), None);
        assert!(!prefs.remove("dry_run"));
    }

    #[test]
    fn wrong_type() {
        let mut prefs = Preferences::in_memory();
        prefs.set("count", "many").unwrap();
        let err = prefs.get::<u32>("count").unwrap_err();
        assert_eq!(err.deref(), &ErrorKind::Preference("count".to_string()));
    }

    #[test]
    fn persisted_to_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut prefs = Preferences::open(&path).unwrap();
        prefs.set(KEY_FILTER, "Wedding").unwrap();
        prefs.get_or_init(KEY_DRY_RUN, || true).unwrap();
        prefs.save().unwrap();

        let reopened = Preferences::open(&path).unwrap();
        assert_eq!(reopened.path(), Some(path.as_path()));
        assert_eq!(reopened.get::<String>(KEY_FILTER).unwrap().as_deref(), Some("Wedding"));
        assert_eq!(reopened.get::<bool>(KEY_DRY_RUN).unwrap(), Some(true));
    }

    #[test]
    fn corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Preferences::open(&path).unwrap_err();
        assert_eq!(*err, ErrorKind::Io);
    }

    #[test]
    fn in_memory_save_is_noop() {
        Preferences::in_memory().save().unwrap();
    }

    #[test]
    fn overlay_initialises_then_overrides() {
        let mut prefs = Preferences::in_memory();
        let mut config = Config::default();
        config.matching.filter = Filter::new("Trip");
        prefs.overlay(&mut config).unwrap();
        assert_eq!(prefs.get::<String>(KEY_FILTER).unwrap().as_deref(), Some("Trip"));
        assert_eq!(prefs.get::<f64>(KEY_THRESHOLD).unwrap(), Some(0.8));
        assert_eq!(prefs.get::<bool>(KEY_DRY_RUN).unwrap(), Some(false));

        prefs.set(KEY_FILTER, "Wedding").unwrap();
        prefs.set(KEY_DRY_RUN, true).unwrap();
        let mut config = Config::default();
        prefs.overlay(&mut config).unwrap();
        assert_eq!(config.matching.filter, Filter::new("Wedding"));
        assert!(config.sync.dry_run);
    }

    #[test]
    fn overlay_validates() {
        let mut prefs = Preferences::in_memory();
        prefs.set(KEY_THRESHOLD, 3.0).unwrap();
        let err = prefs.overlay(&mut Config::default()).unwrap_err();
        assert_eq!(*err, ErrorKind::Invalid("matching.threshold"));
    }
}
