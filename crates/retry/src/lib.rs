//! Bounded retry for fallible async operations.
//!
//! [`Retry`] invokes an operation up to [`RetryPolicy::attempts`] times,
//! waiting [`RetryPolicy::delay`] between attempts, and hands back a
//! [`RetryOutcome`]. Running out of attempts is an expected outcome, not an
//! error: the caller decides what "no data" means for its workflow.

mod executor;
mod outcome;
mod policy;

pub use crate::executor::{Retry, retry};
pub use crate::outcome::{AttemptFailure, Rejection, RetryOutcome};
pub use crate::policy::RetryPolicy;
pub use tokio_util::sync::CancellationToken;
