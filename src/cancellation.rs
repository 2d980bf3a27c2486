use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

use crate::errors::TranscriptionError;

// @module: Explicit cancellation token for long-running operations

/// Cancellation token passed into long-running operations.
///
/// Cloned freely; all clones observe the same cancellation. Operations call
/// [`CancellationToken::check`] between phases and `tokio::select!` over
/// [`CancellationToken::cancelled`] while a subprocess runs so it can be
/// killed promptly.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    flag: AtomicBool,
    notify: Notify,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            flag: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }
}

impl CancellationToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; wakes every task awaiting [`Self::cancelled`]
    pub fn cancel(&self) {
        self.inner.flag.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Phase boundary check: error out with the cancellation-specific
    /// condition if a cancel was requested
    pub fn check(&self) -> Result<(), TranscriptionError> {
        if self.is_cancelled() {
            Err(TranscriptionError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolve once cancellation is requested; never resolves otherwise
    pub async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);

        // Register interest before re-checking the flag to avoid a missed wakeup
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}
