//! Cooperative cancellation and deadlines for running queries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use oilprice_types::CancelReason;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellation signal shared between a caller and a running query.
///
/// Clones share state: cancelling any clone cancels them all. A token may
/// also carry a deadline, after which it reports itself as expired.
/// Queries check the token between page requests, never mid-page.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Creates a token that is never cancelled unless [`cancel`](Self::cancel) is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that expires at `deadline`.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            inner: Arc::default(),
            deadline: Some(deadline),
        }
    }

    /// Creates a token that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Returns a token sharing this token's cancel flag whose deadline is
    /// at most `timeout` from now.
    #[must_use]
    pub fn limited_to(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        Self {
            inner: Arc::clone(&self.inner),
            deadline: Some(self.deadline.map_or(deadline, |d| d.min(deadline))),
        }
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels the token and wakes every task waiting on it.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Returns why the token has fired, or `None` if the query may proceed.
    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            Some(CancelReason::Cancelled)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(CancelReason::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Returns true if the token was cancelled or its deadline passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// Waits until the token is cancelled or its deadline passes.
    pub async fn cancelled(&self) -> CancelReason {
        loop {
            // Register before checking the flag so a concurrent cancel() is not missed.
            let notified = self.inner.notify.notified();
            if let Some(reason) = self.reason() {
                return reason;
            }
            match self.deadline {
                Some(deadline) => tokio::select! {
                    () = notified => {}
                    () = tokio::time::sleep_until(deadline) => return CancelReason::DeadlineExceeded,
                },
                None => notified.await,
            }
        }
    }

    /// Sleeps for `duration` unless the token fires first.
    ///
    /// Returns `Err(reason)` if the sleep was cut short.
    pub async fn sleep(&self, duration: Duration) -> Result<(), CancelReason> {
        tokio::select! {
            reason = self.cancelled() => Err(reason),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }
}
