//! Retry policy for transient page failures.

use std::time::Duration;

use oilprice_types::FetchError;
use rand::Rng;

/// Retry policy with exponential backoff and jitter.
///
/// Attempts are counted from 0. The delay before retrying after attempt `n`
/// is `min(base_delay * 2^n, max_delay)`, plus up to 30% random jitter when
/// enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts per page, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on the delay before any retry (jitter excluded).
    pub max_delay: Duration,
    /// Whether to add random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Largest jitter added to a delay, as a fraction of the delay.
    pub const JITTER_FRACTION: f64 = 0.3;

    /// Creates a policy with `max_attempts` attempts and default backoff.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self::with_max_attempts(1)
    }

    /// Sets the backoff delays.
    #[must_use]
    pub const fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Enables or disables jitter.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns true if a failure on `attempt` (0-based) should be retried.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, error: &FetchError) -> bool {
        error.is_transient() && attempt.saturating_add(1) < self.max_attempts
    }

    /// Returns the backoff delay (without jitter) after `attempt` (0-based).
    #[must_use]
    pub fn base_delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(20);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Returns the delay to wait after `attempt` (0-based) before retrying.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.base_delay_for(attempt);
        if !self.jitter || base.is_zero() {
            return base;
        }
        let fraction = rand::thread_rng().gen_range(0.0..=Self::JITTER_FRACTION);
        base + base.mul_f64(fraction)
    }
}
