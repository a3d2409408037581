use std::time::Duration;

/// How many times, and how patiently, to retry an operation.
///
/// **Retries are not attempts.** `max_retries` counts the attempts made
/// *after* the first one, so the default of 2 retries means up to 3
/// invocations of the operation in total. The delay is only applied between
/// attempts, never after the final one.
///
/// ```
/// use lrkit_retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_retries(), 2);
/// assert_eq!(policy.attempts(), 3);
/// assert_eq!(policy.delay(), Duration::from_secs(1));
///
/// let policy = RetryPolicy::new(5, Duration::from_millis(250)).with_label("fetch collections");
/// assert_eq!(policy.attempts(), 6);
/// assert_eq!(policy.label(), Some("fetch collections"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
    label: Option<String>,
}
impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            label: None,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn once() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Attach a human-readable label, used in diagnostics only.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total attempt budget: the initial attempt plus every retry.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(2, 3)]
    #[case(10, 11)]
    #[case(u32::MAX, u32::MAX)]
    fn attempts_include_the_first(#[case] retries: u32, #[case] attempts: u32) {
        assert_eq!(RetryPolicy::new(retries, Duration::ZERO).attempts(), attempts);
    }

    #[test]
    fn once_has_no_retries() {
        let policy = RetryPolicy::once();
        assert_eq!(policy.attempts(), 1);
        assert_eq!(policy.delay(), Duration::ZERO);
        assert_eq!(policy.label(), None);
    }

    #[test]
    fn builders_replace_fields() {
        let policy = RetryPolicy::default()
            .with_max_retries(4)
            .with_delay(Duration::from_millis(10))
            .with_label("upload");
        assert_eq!(policy.max_retries(), 4);
        assert_eq!(policy.delay(), Duration::from_millis(10));
        assert_eq!(policy.label(), Some("upload"));
    }
}
