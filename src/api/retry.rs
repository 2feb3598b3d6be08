//! Retry budget for Digital Collections API operations.
//!
//! Every operation uses a fixed number of attempts with a fixed delay between
//! them. A single [`RetryBudget`] can be shared across several requests (the
//! whole listing walk) or used for a single one (one image download).

use std::time::Duration;

/// Default number of attempts before an operation is abandoned.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Default delay between attempts (4 seconds).
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(4);

/// How many attempts an operation gets and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy. At least one attempt is always made.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that retries without waiting.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

/// Failure counter for one retried operation.
#[derive(Debug)]
pub struct RetryBudget {
    policy: RetryPolicy,
    failures: u32,
}

impl RetryBudget {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    /// Number of failures recorded so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    /// Record a failed attempt.
    ///
    /// Returns `true` if another attempt may be made, `false` once the
    /// budget is spent.
    pub fn record_failure(&mut self) -> bool {
        self.failures = self.failures.saturating_add(1);
        !self.is_exhausted()
    }

    pub fn is_exhausted(&self) -> bool {
        self.failures >= self.policy.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.policy.delay
    }

    /// Sleep for the configured delay before the next attempt.
    pub async fn wait(&self) {
        if !self.policy.delay.is_zero() {
            tokio::time::sleep(self.policy.delay).await;
        }
    }
}
