use crate::outcome::{AttemptFailure, Rejection, RetryOutcome};
use crate::policy::RetryPolicy;
use std::fmt::Display;
use std::future::Future;
use tokio_util::sync::CancellationToken;

type Validator<'a, T> = Box<dyn Fn(&T) -> bool + Send + Sync + 'a>;
type FailureHook<'a, E> = Box<dyn Fn(u32, u32, &AttemptFailure<E>) + Send + Sync + 'a>;

/// Runs a fallible async operation until it produces an acceptable value or
/// the [`RetryPolicy`] budget runs out.
///
/// The operation returns `Result<Option<T>, E>`: an `Err` is a *faulted*
/// attempt, `Ok(None)` (nothing produced) and values refused by the optional
/// validator are *rejected* attempts. The first `Ok(Some(value))` that passes
/// validation is returned straight away.
///
/// Between attempts the calling task sleeps for the policy's delay using
/// [`tokio::time::sleep`], so other tasks keep running. There is no delay
/// after the last attempt.
///
/// # Idempotency
/// An operation may run several times, including after an attempt that
/// failed *late* (e.g. a POST whose response was lost). Operations that are
/// not idempotent must detect partial completion themselves.
///
/// # Examples
///
/// ```
/// use lrkit_retry::{Retry, RetryPolicy};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut calls = 0;
/// let outcome = Retry::new(RetryPolicy::new(2, Duration::from_millis(1)))
///     .validate(|body: &String| body.starts_with('['))
///     .run(|| {
///         calls += 1;
///         let body = if calls < 3 { "<html>busy</html>" } else { "[]" };
///         async move { Ok::<_, std::io::Error>(Some(body.to_string())) }
///     })
///     .await;
/// assert_eq!(outcome.into_value().as_deref(), Some("[]"));
/// assert_eq!(calls, 3);
/// # }
/// ```
pub struct Retry<'a, T, E> {
    policy: RetryPolicy,
    validator: Option<Validator<'a, T>>,
    on_failure: Option<FailureHook<'a, E>>,
    cancel: Option<CancellationToken>,
}
impl<'a, T, E> Retry<'a, T, E>
where
    E: Display,
{
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            validator: None,
            on_failure: None,
            cancel: None,
        }
    }

    /// Only accept values for which `validator` returns `true`.
    pub fn validate(mut self, validator: impl Fn(&T) -> bool + Send + Sync + 'a) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Call `hook` after every failed attempt with the attempt number
    /// (1-based), the total attempt budget, and what went wrong.
    ///
    /// The hook is purely observational; it cannot influence the retry loop.
    pub fn on_failure(mut self, hook: impl Fn(u32, u32, &AttemptFailure<E>) + Send + Sync + 'a) -> Self {
        self.on_failure = Some(Box::new(hook));
        self
    }

    /// Stop early once `token` is cancelled. Checked before every attempt and
    /// while waiting between attempts; an in-flight attempt is not interrupted.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn run<F, Fut>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        let total = self.policy.attempts();
        let label = self.policy.label().unwrap_or("operation");
        let mut attempt = 0;
        loop {
            if self.is_cancelled() {
                tracing::debug!(label, attempts = attempt, "Retry cancelled before next attempt");
                return RetryOutcome::Cancelled { attempts: attempt };
            }
            attempt += 1;
            let failure = match operation().await {
                Ok(Some(value)) if self.accepts(&value) => {
                    if attempt > 1 {
                        tracing::debug!(label, attempt, total, "Succeeded after retrying");
                    }
                    return RetryOutcome::Success { value, attempts: attempt };
                },
                Ok(Some(_)) => AttemptFailure::Rejected(Rejection::Invalid),
                Ok(None) => AttemptFailure::Rejected(Rejection::Empty),
                Err(e) => AttemptFailure::Faulted(e),
            };
            tracing::warn!(label, attempt, total, reason = %failure, "Attempt failed");
            if let Some(hook) = &self.on_failure {
                hook(attempt, total, &failure);
            }
            if attempt >= total {
                tracing::warn!(label, attempts = attempt, "Giving up; retry budget exhausted");
                return RetryOutcome::Exhausted { attempts: attempt, last: failure };
            }
            if !self.pause().await {
                tracing::debug!(label, attempts = attempt, "Retry cancelled while waiting");
                return RetryOutcome::Cancelled { attempts: attempt };
            }
        }
    }

    fn accepts(&self, value: &T) -> bool {
        self.validator.as_ref().is_none_or(|validate| validate(value))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Wait out the delay between attempts. Returns `false` if cancelled first.
    async fn pause(&self) -> bool {
        let delay = self.policy.delay();
        match &self.cancel {
            Some(token) => tokio::select! {
                () = token.cancelled() => false,
                () = tokio::time::sleep(delay) => true,
            },
            None => {
                tokio::time::sleep(delay).await;
                true
            },
        }
    }
}

/// Shorthand for [`Retry::new`] followed by [`Retry::run`], without a
/// validator, hook or cancellation.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, operation: F) -> RetryOutcome<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    Retry::new(policy).run(operation).await
}
