//! Bounded retry with capped exponential backoff.

use crate::domain::FetchError;
use crate::infrastructure::Clock;
use std::time::Duration;

/// How many times a transient failure is attempted, and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(30_000),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following failed attempt `attempt_index`
    /// (zero-based): `min(base * 2^attempt_index, max)`.
    #[must_use]
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt bound is reached. Waits between attempts on `clock`.
    ///
    /// # Errors
    ///
    /// Returns the last [`FetchError`] produced by `operation`.
    pub fn run<T, F>(&self, clock: &dyn Clock, mut operation: F) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Result<T, FetchError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => {
                    tracing::debug!(attempt = attempt, error = %e, "non-retryable fetch failure");
                    return Err(e);
                }
                Err(e) if attempt + 1 >= attempts => {
                    tracing::debug!(attempts = attempts, error = %e, "retry bound exhausted");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    tracing::debug!(
                        attempt = attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "transient fetch failure, backing off"
                    );
                    clock.sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ManualClock;
    use chrono::Utc;

    #[test]
    fn backoff_doubles_then_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(4), Duration::from_secs(16));
        assert_eq!(policy.delay_for(5), Duration::from_secs(30));
        assert_eq!(policy.delay_for(40), Duration::from_secs(30));
    }

    #[test]
    fn transient_failures_are_retried_until_success() {
        let clock = ManualClock::new(Utc::now());
        let result = RetryPolicy::default().run(&clock, |attempt| {
            if attempt < 2 {
                Err(FetchError::transport(Some(502), "bad gateway"))
            } else {
                Ok(attempt)
            }
        });

        assert_eq!(result, Ok(2));
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(1), Duration::from_secs(2)]);
    }

    #[test]
    fn gives_up_after_the_attempt_bound() {
        let clock = ManualClock::new(Utc::now());
        let mut calls = 0;
        let result: Result<(), FetchError> = RetryPolicy::default().run(&clock, |_| {
            calls += 1;
            Err(FetchError::transport(Some(500), "Failed to fetch skips: 500"))
        });

        assert_eq!(calls, 3);
        assert_eq!(result.unwrap_err().status, Some(500));
        assert_eq!(clock.sleeps().len(), 2);
    }

    #[test]
    fn invalid_format_is_not_retried() {
        let clock = ManualClock::new(Utc::now());
        let mut calls = 0;
        let result: Result<(), FetchError> = RetryPolicy::default().run(&clock, |_| {
            calls += 1;
            Err(FetchError::invalid_format("expected array of skips"))
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert!(clock.sleeps().is_empty());
    }
}
