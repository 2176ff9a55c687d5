//! # Lookup Retry
//!
//! Bounded retry with exponential backoff for idempotent calls.
//!
//! ```text
//! attempt 1 ──fail(retryable)──► wait ~initial ──► attempt 2 ──► ...
//!                                                     │
//!   stops at: success, a non-retryable error, or max_retries exhausted
//! ```
//!
//! Mutations (purchase / consume / open) never go through here: posting a
//! purchase twice would book it twice.

use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use tracing::{debug, warn};

use crate::error::ClientResult;

/// How often and how patiently to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first; 0 = single attempt.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::none()
    }
}

impl RetryPolicy {
    /// Single attempt, no retry.
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
        }
    }

    /// Runs `op` until it succeeds, fails permanently, or retries run out.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> ClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let mut backoff = self.create_backoff();
        let mut retries = 0u32;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retries < self.max_retries => {
                    retries += 1;
                    let wait = backoff.next_backoff().unwrap_or(self.max_backoff);
                    warn!(error = %e, attempt = retries, ?wait, "Retrying after transport failure");
                    tokio::time::sleep(wait).await;
                }
                Err(e) => {
                    debug!(error = %e, retries, "Giving up");
                    return Err(e);
                }
            }
        }
    }

    fn create_backoff(&self) -> ExponentialBackoff {
        // next_backoff() grows from current_interval, not initial_interval
        let first = self.initial_backoff.min(self.max_backoff);
        ExponentialBackoff {
            current_interval: first,
            initial_interval: first,
            max_interval: self.max_backoff,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            ..RetryPolicy::none()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_by_default() {
        let calls = &AtomicU32::new(0);
        let result: ClientResult<()> = RetryPolicy::default()
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::Timeout)
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_errors_until_success() {
        let calls = &AtomicU32::new(0);
        let result = policy(3)
            .run(move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(ClientError::Network("reset".into()))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let calls = &AtomicU32::new(0);
        let result: ClientResult<()> = policy(2)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::Timeout)
            })
            .await;

        assert!(matches!(result, Err(ClientError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_first_wait_follows_initial_backoff() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_secs(5),
        };
        let mut backoff = policy.create_backoff();
        let factor = backoff.randomization_factor;

        let slack = Duration::from_micros(1);

        let first = backoff.next_backoff().unwrap();
        assert!(first + slack >= Duration::from_millis(10).mul_f64(1.0 - factor));
        assert!(first <= Duration::from_millis(10).mul_f64(1.0 + factor) + slack);
    }

    #[test]
    fn test_waits_never_exceed_max_backoff() {
        let policy = RetryPolicy {
            max_retries: 10,
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_millis(100),
        };
        let mut backoff = policy.create_backoff();
        let ceiling = Duration::from_millis(100).mul_f64(1.0 + backoff.randomization_factor)
            + Duration::from_micros(1);

        for _ in 0..10 {
            assert!(backoff.next_backoff().unwrap() <= ceiling);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_status_is_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: ClientResult<()> = policy(5)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::HttpStatus {
                    status: 503,
                    reason: "Service Unavailable".into(),
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
