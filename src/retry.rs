//! Bounded retry around remote API calls.
//!
//! Transient failures (non-2xx statuses other than 401, transport errors) are
//! retried until the attempt budget runs out. A rejected or unsendable token
//! and an unreadable payload end the loop immediately.

use crate::errors::{ApiError, RetryError};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    Exponential { initial: Duration, max: Duration },
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

/// Result of a retried call plus one log line per failed attempt.
#[derive(Debug)]
pub struct RetryReport<T> {
    pub outcome: Result<T, RetryError>,
    pub log: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Backoff::Fixed(Duration::from_secs(2)))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Wait applied after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { initial, max } => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                initial.saturating_mul(factor).min(max)
            }
        }
    }

    pub async fn run<T, F, Fut>(&self, mut op: F) -> RetryReport<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut log = Vec::new();

        for attempt in 1..=self.max_attempts {
            let err = match op().await {
                Ok(value) => {
                    return RetryReport {
                        outcome: Ok(value),
                        log,
                    };
                }
                Err(err) => err,
            };

            log.push(format!("attempt {attempt}/{} failed: {err}", self.max_attempts));

            if !err.is_transient() {
                let outcome = match err {
                    ApiError::Unauthorized | ApiError::InvalidToken => Err(RetryError::Unauthorized),
                    other => Err(RetryError::Malformed(other.to_string())),
                };
                return RetryReport { outcome, log };
            }

            warn!(attempt, max = self.max_attempts, "remote call failed: {err}");
            if attempt < self.max_attempts {
                tokio::time::sleep(self.delay_after(attempt)).await;
            }
        }

        warn!(attempts = self.max_attempts, "retry budget exhausted");
        RetryReport {
            outcome: Err(RetryError::Exhausted {
                attempts: self.max_attempts,
            }),
            log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::cell::Cell;

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Backoff::Fixed(Duration::ZERO))
    }

    #[tokio::test]
    async fn success_after_transient_failures_keeps_log() {
        let calls = Cell::new(0u32);
        let report = quick(5)
            .run(|| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n <= 3 {
                        Err(ApiError::Status(StatusCode::SERVICE_UNAVAILABLE))
                    } else {
                        Ok("payload")
                    }
                }
            })
            .await;

        assert_eq!(report.outcome.unwrap(), "payload");
        assert_eq!(report.log.len(), 3);
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test]
    async fn unauthorized_short_circuits() {
        let calls = Cell::new(0u32);
        let report = quick(5)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(ApiError::Unauthorized) }
            })
            .await;

        assert!(matches!(report.outcome, Err(RetryError::Unauthorized)));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn unsendable_token_counts_as_unauthorized() {
        let calls = Cell::new(0u32);
        let report = quick(5)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(ApiError::InvalidToken) }
            })
            .await;

        assert!(matches!(report.outcome, Err(RetryError::Unauthorized)));
        assert_eq!(report.log.len(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn malformed_short_circuits() {
        let calls = Cell::new(0u32);
        let report = quick(5)
            .run(|| {
                calls.set(calls.get() + 1);
                async { serde_json::from_str::<serde_json::Value>("{").map_err(ApiError::from) }
            })
            .await;

        assert!(matches!(report.outcome, Err(RetryError::Malformed(_))));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn exhausts_budget() {
        let calls = Cell::new(0u32);
        let report = quick(5)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(ApiError::Status(StatusCode::BAD_GATEWAY)) }
            })
            .await;

        assert!(matches!(
            report.outcome,
            Err(RetryError::Exhausted { attempts: 5 })
        ));
        assert_eq!(report.log.len(), 5);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let policy = RetryPolicy::new(
            6,
            Backoff::Exponential {
                initial: Duration::from_millis(100),
                max: Duration::from_millis(500),
            },
        );
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
        assert_eq!(policy.delay_after(4), Duration::from_millis(500));
    }

    #[test]
    fn zero_attempts_is_clamped() {
        assert_eq!(RetryPolicy::new(0, Backoff::Fixed(Duration::ZERO)).max_attempts, 1);
    }
}
