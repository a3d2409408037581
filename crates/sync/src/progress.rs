//! Progress reporting and user cancellation.

use tokio_util::sync::CancellationToken;

/// A host-provided, user-cancelable progress indicator.
///
/// Methods take `&self`: hosts hand out a shared handle and synchronise
/// internally.
pub trait Progress: Send + Sync {
    fn set_caption(&self, caption: &str);
    fn set_portion_complete(&self, done: u64, total: u64);
    fn is_canceled(&self) -> bool;
    /// Release the indicator. Called exactly once per [`ProgressScope`].
    fn done(&self);
}

/// Guard that calls [`Progress::done`] when dropped, whichever way the
/// owning scope is left: normal completion, early return, error, or the
/// consumer dropping a stream half way through.
pub struct ProgressScope<'a> {
    progress: &'a dyn Progress,
}
impl<'a> ProgressScope<'a> {
    pub fn new(progress: &'a dyn Progress, caption: &str) -> Self {
        progress.set_caption(caption);
        Self { progress }
    }

    pub fn caption(&self, caption: &str) {
        self.progress.set_caption(caption);
    }

    pub fn portion(&self, done: u64, total: u64) {
        self.progress.set_portion_complete(done, total);
    }

    pub fn is_canceled(&self) -> bool {
        self.progress.is_canceled()
    }
}
impl Drop for ProgressScope<'_> {
    fn drop(&mut self) {
        self.progress.done();
    }
}

/// Headless [`Progress`] that reports through `tracing` and is cancelled via
/// a [`CancellationToken`]. Useful outside of a host, e.g. in a daemon or
/// test harness.
#[derive(Debug, Clone, Default)]
pub struct LogProgress {
    cancel: CancellationToken,
}
impl LogProgress {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}
impl Progress for LogProgress {
    fn set_caption(&self, caption: &str) {
        tracing::debug!(caption, "Progress");
    }

    fn set_portion_complete(&self, done: u64, total: u64) {
        tracing::trace!(done, total, "Progress");
    }

    fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn done(&self) {
        tracing::debug!("Progress finished");
    }
}
