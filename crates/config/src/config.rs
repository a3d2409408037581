use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use lrkit_matching::{Filter, FuzzyMatcher};
use lrkit_retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

/// Prefix for environment variable overrides. Nested keys are separated by a
/// double underscore, e.g. `LRKIT_RETRY__MAX_RETRIES=5`.
pub const ENV_PREFIX: &str = "LRKIT_";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
///
/// Every field has a default, so an empty file (or no file at all) is a valid
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub retry: RetryConfig,
    pub matching: MatchingConfig,
    pub sync: SyncConfig,
}

/// Retry settings for every remote call made during a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries *after* the first attempt; `2` means three attempts total.
    pub max_retries: u32,
    /// Pause between attempts, in milliseconds.
    pub delay_ms: u64,
    /// Optional label used in log output.
    pub label: Option<String>,
}
impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: RetryPolicy::DEFAULT_MAX_RETRIES,
            delay_ms: u64::try_from(RetryPolicy::DEFAULT_DELAY.as_millis()).unwrap_or(1000),
            label: None,
        }
    }
}
impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(self.max_retries, Duration::from_millis(self.delay_ms));
        match &self.label {
            Some(label) => policy.with_label(label),
            None => policy,
        }
    }
}

/// Which items are processed, and how loosely names are reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Semicolon-separated substring patterns; empty selects everything.
    /// Read and written as the expression string.
    pub filter: Filter,
    /// Minimum similarity for a fuzzy name match, within `0.0..=1.0`.
    pub threshold: f64,
}
impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            threshold: FuzzyMatcher::DEFAULT_THRESHOLD,
        }
    }
}
impl MatchingConfig {
    pub fn matcher(&self) -> Result<FuzzyMatcher> {
        FuzzyMatcher::new(self.threshold).or_raise(|| ErrorKind::Invalid("matching.threshold"))
    }
}

/// Remote endpoint and run mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the remote service, without a trailing slash.
    pub endpoint: Option<String>,
    /// Log intended changes instead of making them.
    pub dry_run: bool,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl Config {
    /// Default configuration file location for the current user, e.g.
    /// `~/.config/lrkit/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lrkit").map(|dirs| dirs.config_dir().join(DEFAULT_FILE_NAME))
    }

    /// Build the layered [`Figment`]: defaults, then the file at `path` (if
    /// any), then `LRKIT_*` environment variables.
    ///
    /// The file format is chosen by extension (`toml`, `yaml`/`yml`, `json`).
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Config::default()));
        let figment = match path {
            None => figment,
            Some(path) => {
                let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
                match extension.as_str() {
                    "toml" => figment.merge(Toml::file(path)),
                    "yaml" | "yml" => figment.merge(Yaml::file(path)),
                    "json" => figment.merge(Json::file(path)),
                    _ => exn::bail!(ErrorKind::UnsupportedFormat(extension)),
                }
            },
        };
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR)))
    }

    /// Load and validate configuration.
    ///
    /// An explicit `path` must exist. Without one, the [default
    /// path](Self::default_path) is used if a file is present there.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) if !path.exists() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };
        tracing::debug!(path = ?path, "Loading configuration");
        let config: Self = Self::figment(path.as_deref())?.extract().or_raise(|| ErrorKind::Extract)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<()> {
        self.matching.matcher()?;
        if let Some(endpoint) = &self.sync.endpoint
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            exn::bail!(ErrorKind::Invalid("sync.endpoint"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;
    use std::ops::Deref;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.delay_ms, 1000);
        assert_eq!(config.retry.policy(), RetryPolicy::default());
        assert_eq!(config.matching.threshold, 0.8);
        assert!(config.matching.filter.is_empty());
        assert!(!config.sync.dry_run);
        assert_eq!(config.sync.endpoint, None);
        config.validate().unwrap();
    }

    #[test]
    fn filter_is_stored_as_its_expression() {
        let matching = MatchingConfig {
            filter: Filter::new(" Trip ;; Wedding"),
            ..MatchingConfig::default()
        };
        let value = serde_json::to_value(&matching).unwrap();
        assert_eq!(value["filter"], "Trip; Wedding");

        let parsed: MatchingConfig = serde_json::from_value(serde_json::json!({ "filter": "a; ;b " })).unwrap();
        assert_eq!(parsed.filter.patterns(), ["a", "b"]);
        assert_eq!(parsed.threshold, FuzzyMatcher::DEFAULT_THRESHOLD);
    }

    #[test]
    fn toml_file_with_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "lrkit.toml",
                r#"
                [retry]
                max_retries = 4
                delay_ms = 250
                label = "catalog sync"

                [matching]
                filter = "Trip; Wedding"

                [sync]
                endpoint = "https://example.test/api"
                headers = { Authorization = "Bearer abc" }
                "#,
            )?;
            jail.set_env("LRKIT_SYNC__DRY_RUN", "true");
            jail.set_env("LRKIT_MATCHING__THRESHOLD", "0.65");

            let config = Config::load(Some(Path::new("lrkit.toml"))).unwrap();
            let policy = config.retry.policy();
            assert_eq!(policy.attempts(), 5);
            assert_eq!(policy.delay(), Duration::from_millis(250));
            assert_eq!(policy.label(), Some("catalog sync"));
            assert_eq!(config.matching.filter.patterns(), ["Trip", "Wedding"]);
            assert_eq!(config.matching.threshold, 0.65);
            assert!(config.sync.dry_run);
            assert_eq!(config.sync.headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
            Ok(())
        });
    }

    // Every test that loads from disk runs inside a `Jail`: it serializes
    // access to the process environment, which `LRKIT_*` overrides read.

    #[rstest]
    #[case("lrkit.yaml", "retry:\n  max_retries: 7\n")]
    #[case("lrkit.yml", "retry:\n  max_retries: 7\n")]
    #[case("lrkit.json", r#"{"retry": {"max_retries": 7}}"#)]
    fn other_formats(#[case] name: &str, #[case] contents: &str) {
        Jail::expect_with(|jail| {
            jail.create_file(name, contents)?;
            let config = Config::load(Some(Path::new(name))).unwrap();
            assert_eq!(config.retry.max_retries, 7);
            assert_eq!(config.retry.delay_ms, 1000);
            Ok(())
        });
    }

    #[test]
    fn unsupported_format() {
        Jail::expect_with(|jail| {
            jail.create_file("lrkit.ini", "")?;
            let err = Config::load(Some(Path::new("lrkit.ini"))).unwrap_err();
            assert_eq!(*err, ErrorKind::UnsupportedFormat("ini".to_string()));
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file() {
        Jail::expect_with(|_| {
            let err = Config::load(Some(Path::new("not-here.toml"))).unwrap_err();
            assert!(matches!(err.deref(), ErrorKind::NotFound(_)));
            Ok(())
        });
    }

    #[rstest]
    #[case("[matching]\nthreshold = 1.5\n", "matching.threshold")]
    #[case("[matching]\nthreshold = -0.5\n", "matching.threshold")]
    #[case("[sync]\nendpoint = \"ftp://example.test\"\n", "sync.endpoint")]
    fn invalid_values(#[case] contents: &str, #[case] field: &'static str) {
        Jail::expect_with(|jail| {
            jail.create_file("lrkit.toml", contents)?;
            let err = Config::load(Some(Path::new("lrkit.toml"))).unwrap_err();
            assert_eq!(*err, ErrorKind::Invalid(field));
            Ok(())
        });
    }

    #[test]
    fn wrong_type_fails_extraction() {
        Jail::expect_with(|jail| {
            jail.create_file("lrkit.toml", "[retry]\nmax_retries = \"lots\"\n")?;
            let err = Config::load(Some(Path::new("lrkit.toml"))).unwrap_err();
            assert_eq!(*err, ErrorKind::Extract);
            Ok(())
        });
    }
}
