use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use lrkit_config::Config;
use lrkit_matching::{Filter, FuzzyMatcher};
use lrkit_retry::RetryPolicy;
use lrkit_transport::Headers;
use tokio_util::sync::CancellationToken;

/// Everything a sync run needs to know, passed explicitly rather than read
/// from globals.
#[derive(Debug, Clone)]
pub struct Context {
    /// Base URL; items are fetched from here and linked at `{endpoint}/{id}`.
    pub endpoint: String,
    pub headers: Headers,
    pub policy: RetryPolicy,
    pub filter: Filter,
    pub matcher: FuzzyMatcher,
    pub dry_run: bool,
    /// Cancels in-flight retries. Fired automatically when the progress
    /// indicator reports a cancellation.
    pub cancel: CancellationToken,
}
impl Context {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            headers: Headers::new(),
            policy: RetryPolicy::default(),
            filter: Filter::default(),
            matcher: FuzzyMatcher::default(),
            dry_run: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = config.sync.endpoint.as_deref().ok_or_raise(|| ErrorKind::Configuration("sync.endpoint"))?;
        let matcher = config.matching.matcher().or_raise(|| ErrorKind::Configuration("matching.threshold"))?;
        Ok(Self {
            headers: config.sync.headers.clone(),
            policy: config.retry.policy(),
            filter: config.matching.filter.clone(),
            matcher,
            dry_run: config.sync.dry_run,
            ..Self::new(endpoint)
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_matcher(mut self, matcher: FuzzyMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub(crate) fn item_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/{id}", self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn from_config() {
        let mut config = Config::default();
        config.sync.endpoint = Some("https://example.test/api/".to_string());
        config.sync.dry_run = true;
        config.retry.max_retries = 0;
        config.retry.delay_ms = 5;
        config.matching.filter = Filter::new("Trip");
        let ctx = Context::from_config(&config).unwrap();
        assert_eq!(ctx.endpoint, "https://example.test/api");
        assert_eq!(ctx.item_url(7), "https://example.test/api/7");
        assert_eq!(ctx.policy, RetryPolicy::new(0, Duration::from_millis(5)));
        assert!(ctx.filter.matches("Road Trip"));
        assert!(ctx.dry_run);
    }

    #[test]
    fn missing_endpoint() {
        let err = Context::from_config(&Config::default()).unwrap_err();
        assert_eq!(*err, ErrorKind::Configuration("sync.endpoint"));
    }

    #[test]
    fn invalid_threshold() {
        let mut config = Config::default();
        config.sync.endpoint = Some("https://example.test".to_string());
        config.matching.threshold = 2.0;
        let err = Context::from_config(&config).unwrap_err();
        assert_eq!(*err, ErrorKind::Configuration("matching.threshold"));
    }
}
