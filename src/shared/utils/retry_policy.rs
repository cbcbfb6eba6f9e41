//! Retry policy for async producers
//!
//! A policy is a plain value (attempt budget plus delay strategy) that can
//! drive any `Fn() -> Future<Output = AppResult<T>>`. The catalog bootstrap
//! uses it with a fixed delay; nothing in here knows about loaders.

use crate::shared::errors::{AppError, AppResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How long to wait before the next attempt
#[derive(Debug, Clone, PartialEq)]
pub enum DelayStrategy {
    /// Same delay between every pair of attempts
    Fixed(Duration),
    /// `base * multiplier^(attempt-1)`, capped at `max`
    Exponential {
        base: Duration,
        multiplier: f64,
        max: Duration,
    },
}

impl DelayStrategy {
    /// Delay after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self {
            DelayStrategy::Fixed(delay) => *delay,
            DelayStrategy::Exponential {
                base,
                multiplier,
                max,
            } => {
                let factor = multiplier.powi(attempt.saturating_sub(1) as i32);
                let delay = Duration::from_millis((base.as_millis() as f64 * factor) as u64);
                delay.min(*max)
            }
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    pub delay: DelayStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_millis(1000))
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: DelayStrategy::Fixed(delay),
        }
    }

    pub fn exponential(max_attempts: u32, base: Duration, multiplier: f64, max: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: DelayStrategy::Exponential {
                base,
                multiplier,
                max,
            },
        }
    }

    /// Sum of all delays a fully failing run waits
    pub fn total_delay(&self) -> Duration {
        (1..self.max_attempts)
            .map(|attempt| self.delay.delay_after(attempt))
            .sum()
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt budget is spent. Sleeps only between attempts.
    ///
    /// `operation` receives the 1-based attempt number.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, operation: F) -> AppResult<T>
    where
        F: Fn(u32) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match operation(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(
                            "{} succeeded on attempt {}/{}",
                            operation_name, attempt, max_attempts
                        );
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if !error.is_retryable() {
                        debug!(
                            "{} failed with non-retryable error: {}",
                            operation_name, error
                        );
                        return Err(error);
                    }

                    if attempt < max_attempts {
                        let delay = self.delay.delay_after(attempt);
                        warn!(
                            "{} failed on attempt {}/{} ({}), retrying in {:?}",
                            operation_name, attempt, max_attempts, error, delay
                        );
                        last_error = Some(error);
                        sleep(delay).await;
                    } else {
                        warn!(
                            "{} failed on final attempt {}/{} ({}), giving up",
                            operation_name, attempt, max_attempts, error
                        );
                        last_error = Some(error);
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AppError::InternalError("All retries exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, DelayStrategy::Fixed(Duration::from_secs(1)));
        assert_eq!(policy.total_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_exponential_delay_is_capped() {
        let policy = RetryPolicy::exponential(
            5,
            Duration::from_millis(100),
            2.0,
            Duration::from_millis(300),
        );
        assert_eq!(policy.delay.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay.delay_after(3), Duration::from_millis(300));
        assert_eq!(policy.delay.delay_after(4), Duration::from_millis(300));
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        assert_eq!(RetryPolicy::fixed(0, Duration::ZERO).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::fixed(3, Duration::from_millis(10));

        let counter = calls.clone();
        let result = policy
            .run("flaky", move |attempt| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if attempt < 3 {
                        Err(AppError::TransportError("down".into()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_stops_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::fixed(5, Duration::from_millis(10));

        let counter = calls.clone();
        let result: AppResult<()> = policy
            .run("invalid", move |_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::ValidationError("nope".into()))
                }
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let policy = RetryPolicy::fixed(2, Duration::from_millis(10));
        let result: AppResult<()> = policy
            .run("always failing", |attempt| async move {
                Err(AppError::TransportError(format!("attempt {}", attempt)))
            })
            .await;

        assert_eq!(result, Err(AppError::TransportError("attempt 2".into())));
    }
}
