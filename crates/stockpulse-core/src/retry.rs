//! Bounded retry with flat, jittered delays.
//!
//! The delay between attempts does not grow: every wait is the base delay
//! scaled by a random factor in `[1.0, 2.0)`.

use std::future::Future;
use std::time::Duration;

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between attempts.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed {
        delay: Duration,
    },
    /// `base * factor`, factor drawn uniformly from `[1.0, 2.0)` per retry.
    Jittered {
        base: Duration,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Jittered {
            base: DEFAULT_BASE_DELAY,
        }
    }
}

impl Backoff {
    /// Draw the delay to wait before the next attempt.
    pub fn delay(self) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Jittered { base } => base.mul_f64(jitter_factor()),
        }
    }
}

/// Multiplicative jitter in `[1.0, 2.0)`.
pub fn jitter_factor() -> f64 {
    1.0 + fastrand::f64()
}

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, first call included. Never below one.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn jittered(base: Duration) -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Backoff::Jittered { base })
    }

    pub fn fixed(delay: Duration, max_attempts: u32) -> Self {
        Self::new(max_attempts, Backoff::Fixed { delay })
    }

    pub fn no_retry() -> Self {
        Self::new(1, Backoff::Fixed {
            delay: Duration::ZERO,
        })
    }
}

/// Final result of a retried operation plus bookkeeping.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
    pub total_delay: Duration,
}

/// Run `operation` until it succeeds, fails with an error `is_retryable`
/// rejects, or the policy runs out of attempts.
///
/// `operation` receives the 1-based attempt number. The last error is
/// returned unchanged once attempts are exhausted.
pub async fn retry<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut total_delay = Duration::ZERO;
    let mut attempt = 1;

    loop {
        let result = operation(attempt).await;
        let should_retry = match &result {
            Ok(_) => false,
            Err(error) => attempt < max_attempts && is_retryable(error),
        };

        if !should_retry {
            return RetryOutcome {
                result,
                attempts: attempt,
                total_delay,
            };
        }

        let delay = policy.backoff.delay();
        tracing::debug!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            "waiting before next attempt"
        );
        tokio::time::sleep(delay).await;
        total_delay += delay;
        attempt += 1;
    }
}
