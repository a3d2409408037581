use derive_more::Display;

/// Why an operation's return value was refused.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The operation completed but produced nothing.
    #[display("operation returned no value")]
    Empty,
    /// The validator refused the value.
    #[display("value failed validation")]
    Invalid,
}

/// A single failed attempt.
///
/// Both variants are treated the same way by the retry loop: they consume one
/// attempt and, if budget remains, trigger a delay and another attempt.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum AttemptFailure<E> {
    /// The operation returned an error.
    #[display("faulted: {_0}")]
    Faulted(E),
    /// The operation returned, but its result wasn't acceptable.
    #[display("rejected: {_0}")]
    Rejected(Rejection),
}
impl<E> AttemptFailure<E> {
    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }
}

/// The result of running an operation under a [`RetryPolicy`](crate::RetryPolicy).
///
/// Neither exhaustion nor cancellation is an error: callers decide whether
/// the absence of a value aborts their workflow or degrades it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T, E> {
    /// An attempt produced an accepted value.
    Success { value: T, attempts: u32 },
    /// Every attempt failed. Carries the final attempt's failure.
    Exhausted { attempts: u32, last: AttemptFailure<E> },
    /// The cancellation token fired before the budget was used up.
    Cancelled { attempts: u32 },
}
impl<T, E> RetryOutcome<T, E> {
    /// Number of times the operation was invoked.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::Exhausted { attempts, .. } | Self::Cancelled { attempts } => {
                *attempts
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// The accepted value, or `None` for both exhaustion and cancellation.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Exhausted { .. } | Self::Cancelled { .. } => None,
        }
    }
}
