//! Retry and rate-limit policy objects.
//!
//! Both wrap remote calls at the client boundary. The retry policy
//! backs off exponentially from `base_delay` up to `max_delay`; the
//! rate limiter admits at most `max_calls` within a rolling window.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use storesync_core::{RateLimitConfig, RetryConfig, SyncError, SyncResult};
use tokio::time::Instant;

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay,
            max_delay: config.max_delay,
        }
    }

    /// Backoff before retry number `attempt` (zero-based): base * 2^attempt,
    /// capped at `max_delay`.
    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `op` until it succeeds or `max_attempts` is exhausted.
    pub async fn run<T, F, Fut>(&self, op: F) -> SyncResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = SyncResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        return Err(err);
                    }
                    let delay = self.delay_for(attempt - 1);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "remote call failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}

/// Rolling-window rate limiter: at most `max_calls` admissions per
/// `window`, waiting callers sleep until a slot frees up.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: u32,
    window: Duration,
    admissions: tokio::sync::Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_calls: config.max_calls.max(1),
            window: config.window,
            admissions: tokio::sync::Mutex::new(VecDeque::new()),
        }
    }

    /// Wait until a call slot is available, then claim it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut admissions = self.admissions.lock().await;
                let now = Instant::now();
                while let Some(oldest) = admissions.front() {
                    if now.duration_since(*oldest) >= self.window {
                        admissions.pop_front();
                    } else {
                        break;
                    }
                }

                if (admissions.len() as u32) < self.max_calls {
                    admissions.push_back(now);
                    return;
                }

                match admissions.front() {
                    Some(oldest) => self.window - now.duration_since(*oldest),
                    None => return,
                }
            };
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(&RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(40),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = quick_retry(5)
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(SyncError::remote_write("transient"))
                } else {
                    Ok(7u64)
                }
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: SyncResult<u64> = quick_retry(3)
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SyncError::remote_write("still down"))
            })
            .await;

        assert!(matches!(result, Err(SyncError::RemoteWrite(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = quick_retry(5);
        assert_eq!(policy.delay_for(0), Duration::from_millis(10));
        assert_eq!(policy.delay_for(1), Duration::from_millis(20));
        assert_eq!(policy.delay_for(2), Duration::from_millis(40));
        // Capped at max_delay from here on.
        assert_eq!(policy.delay_for(3), Duration::from_millis(40));
    }

    #[tokio::test(start_paused = true)]
    async fn limiter_blocks_once_window_is_full() {
        let limiter = RateLimiter::new(&RateLimitConfig {
            max_calls: 2,
            window: Duration::from_secs(60),
        });

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        // Third call must wait out the rolling window.
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(60));
    }
}
