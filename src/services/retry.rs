//! Retry policy for generation calls.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::models::RetryConfig;

/// Retry policy with capped exponential backoff
///
/// Backoff before retry `n` (0-indexed) is `min(initial * 2^n, max)`.
/// Setting `initial == max` gives a fixed delay, which is the default
/// (3 attempts, 300ms apart).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    max_attempts: u32,
    /// Initial backoff duration in milliseconds
    initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds
    max_backoff_ms: u64,
}

/// Error returned once every attempt has failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// Attempts made
    pub attempts: u32,
    /// Error of the final attempt
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed after {} attempts: {}",
            self.attempts, self.last_error
        )
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// # Arguments
    /// * `max_attempts` - Total attempts (recommended: 3)
    /// * `initial_backoff_ms` - Delay before the first retry
    /// * `max_backoff_ms` - Upper bound for any delay
    ///
    /// # Example
    /// ```
    /// use codecanvas::services::retry::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(3, 300, 300);
    /// assert_eq!(policy.max_attempts(), 3);
    /// ```
    pub fn new(max_attempts: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        assert!(max_attempts > 0, "max_attempts must be greater than 0");
        assert!(
            max_backoff_ms >= initial_backoff_ms,
            "max_backoff_ms must be >= initial_backoff_ms"
        );

        Self {
            max_attempts,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Fixed delay between attempts.
    pub fn fixed(max_attempts: u32, backoff: Duration) -> Self {
        let ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX);
        Self::new(max_attempts, ms, ms)
    }

    /// Build from validated configuration.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts.max(1),
            config.initial_backoff_ms,
            config.max_backoff_ms.max(config.initial_backoff_ms),
        )
    }

    /// Total attempt budget, first attempt included.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Execute an operation until it succeeds or the attempt budget is spent
    ///
    /// The closure receives the 1-based attempt number. Any error is retried;
    /// the delay is only applied between attempts, never after the last one.
    ///
    /// # Example
    /// ```
    /// # use codecanvas::services::retry::RetryPolicy;
    /// # async fn example() {
    /// let policy = RetryPolicy::new(3, 1, 1);
    /// let result = policy
    ///     .execute(|attempt| async move {
    ///         if attempt < 2 { Err("flaky") } else { Ok(attempt) }
    ///     })
    ///     .await;
    /// assert_eq!(result, Ok(2));
    /// # }
    /// ```
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(RetryExhausted {
                            attempts: attempt,
                            last_error: err,
                        });
                    }

                    sleep(self.calculate_backoff(attempt - 1)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Calculate backoff duration before retry `retry` (0-indexed)
    ///
    /// Formula: min(initial_backoff * 2^retry, max_backoff)
    fn calculate_backoff(&self, retry: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(retry))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }
}

impl Default for RetryPolicy {
    /// Three attempts with a fixed 300ms delay.
    fn default() -> Self {
        Self::new(3, 300, 300)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_fixed_backoff() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.calculate_backoff(0), Duration::from_millis(300));
        assert_eq!(policy.calculate_backoff(1), Duration::from_millis(300));
        assert_eq!(policy.calculate_backoff(5), Duration::from_millis(300));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let policy = RetryPolicy::new(5, 100, 350);

        assert_eq!(policy.calculate_backoff(0), Duration::from_millis(100));
        assert_eq!(policy.calculate_backoff(1), Duration::from_millis(200));
        assert_eq!(policy.calculate_backoff(2), Duration::from_millis(350));
        assert_eq!(policy.calculate_backoff(30), Duration::from_millis(350));
    }

    #[test]
    fn test_from_config() {
        let policy = RetryPolicy::from_config(&RetryConfig::default());
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    #[should_panic(expected = "max_attempts must be greater than 0")]
    fn test_zero_attempts_rejected() {
        let _ = RetryPolicy::new(0, 1, 1);
    }

    #[tokio::test]
    async fn test_execute_succeeds_immediately() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1));
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<u32, RetryExhausted<String>> = policy
            .execute(|attempt| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_retries_until_success() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1));
        let calls = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|attempt| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if attempt < 3 {
                        Err(format!("failure {attempt}"))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_reports_last_error_when_exhausted() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1));

        let result: Result<(), _> = policy
            .execute(|attempt| async move { Err(format!("failure {attempt}")) })
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last_error, "failure 3");
        assert_eq!(exhausted.to_string(), "failed after 3 attempts: failure 3");
    }
}
