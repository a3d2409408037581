//! Configuration loading and validation.
//!
//! [`Config`] is layered with [figment]: built-in defaults, then an optional
//! TOML/YAML/JSON file, then `LRKIT_*` environment variables. [`Preferences`]
//! holds the per-user values a host dialog edits between runs, and can be
//! [overlaid](Preferences::overlay) on top of a loaded [`Config`].

mod config;
pub mod error;
mod prefs;

pub use crate::config::{Config, ENV_PREFIX, MatchingConfig, RetryConfig, SyncConfig};
pub use crate::prefs::{KEY_DRY_RUN, KEY_FILTER, KEY_THRESHOLD, Preferences};
