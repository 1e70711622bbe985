use std::time::Duration;

/// Decision returned by the backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up; the caller returns the last observed error.
    Stop,
    /// Retry after the given delay.
    After(Duration),
}

/// Exponential backoff bounded by an attempt count and a total-duration budget.
///
/// The delay sequence is deterministic and non-decreasing: it doubles from
/// `initial_delay` and a retry is only granted while `elapsed + delay` stays
/// inside `max_total`, so cumulative attempts never exceed the budget.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    /// Delay before the second attempt; doubles from here.
    pub initial_delay: Duration,
    /// Budget for the whole retry sequence, sleeps included.
    pub max_total: Duration,
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_total: Duration::from_secs(120),
            max_attempts: 6,
        }
    }
}

impl BackoffPolicy {
    /// Delay that would follow the `attempt`-th failure (1-based).
    ///
    /// Doubling with a clamped shift so large attempt numbers saturate
    /// instead of overflowing.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = 1u32 << attempt.saturating_sub(1).min(16);
        self.initial_delay.saturating_mul(exp)
    }

    /// Whether to retry after the `attempt`-th failure (1-based), given the
    /// time already spent.
    pub fn decide(&self, attempt: u32, elapsed: Duration) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::Stop;
        }
        let delay = self.delay_for(attempt);
        match elapsed.checked_add(delay) {
            Some(total) if total < self.max_total => RetryDecision::After(delay),
            _ => RetryDecision::Stop,
        }
    }
}
