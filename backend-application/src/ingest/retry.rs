use std::fmt;
use std::future::Future;
use std::time::Duration;

use backend_domain::{PipelineConfig, StoreError, UpstreamError};
use tokio::time::sleep;
use tracing::warn;

use crate::ingest::RateGovernor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// `base * 2^(attempt - 1)`, capped.
    Exponential { base: Duration, cap: Duration },
}

impl Backoff {
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, cap } => {
                let factor = 1u32 << attempt.saturating_sub(1).min(16);
                base.saturating_mul(factor).min(cap)
            }
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Upstream asked us to slow down; wait the supplied (or default) duration.
    Throttle(Option<Duration>),
    Backoff,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The classifier declared the failure final.
    Stopped(E),
    Exhausted {
        last: E,
        attempts: u32,
        throttled_only: bool,
    },
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Stopped(err) => write!(f, "{}", err),
            RetryError::Exhausted { last, attempts, .. } => {
                write!(f, "gave up after {} attempts: {}", attempts, last)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn upstream(config: &PipelineConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: Backoff::Exponential {
                base: Duration::from_millis(config.backoff_base_ms),
                cap: Duration::from_millis(config.backoff_cap_ms),
            },
        }
    }

    pub fn persistence(config: &PipelineConfig) -> Self {
        Self {
            max_attempts: config.persist_attempts.max(1),
            backoff: Backoff::Fixed(Duration::from_millis(config.persist_retry_delay_ms)),
        }
    }

    /// Runs `op` until it succeeds, the classifier stops it, or attempts run out.
    ///
    /// With a governor, every attempt first claims a rate slot and throttle
    /// waits go through the governor so all workers of the session pause.
    pub async fn run<T, E, F, Fut, C>(
        &self,
        label: &str,
        governor: Option<&RateGovernor>,
        mut op: F,
        classify: C,
    ) -> Result<T, RetryError<E>>
    where
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> Retry,
    {
        let mut attempt = 0;
        let mut throttled_only = true;
        loop {
            attempt += 1;
            if let Some(governor) = governor {
                governor.acquire().await;
            }

            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let decision = classify(&err);
            if decision == Retry::Stop {
                return Err(RetryError::Stopped(err));
            }
            if decision == Retry::Backoff {
                throttled_only = false;
            }
            if attempt >= self.max_attempts {
                warn!(attempt, "{} failed, no attempts left: {}", label, err);
                return Err(RetryError::Exhausted {
                    last: err,
                    attempts: attempt,
                    throttled_only,
                });
            }

            match (decision, governor) {
                (Retry::Throttle(retry_after), Some(governor)) => {
                    governor.throttle(retry_after).await;
                }
                (Retry::Throttle(retry_after), None) => {
                    sleep(retry_after.unwrap_or_else(|| self.backoff.delay(attempt))).await;
                }
                _ => {
                    let wait = self.backoff.delay(attempt);
                    warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "{} failed, retrying: {}",
                        label,
                        err
                    );
                    sleep(wait).await;
                }
            }
        }
    }
}

/// Match-id listing: server and transport failures are retried, other statuses end paging.
pub fn classify_listing(err: &UpstreamError) -> Retry {
    match err {
        UpstreamError::Throttled { retry_after } => Retry::Throttle(*retry_after),
        UpstreamError::Server { .. } | UpstreamError::Transport(_) => Retry::Backoff,
        UpstreamError::Client { .. } | UpstreamError::Decode(_) => Retry::Stop,
    }
}

/// Detail payloads: any non-throttle status abandons the item.
pub fn classify_detail(err: &UpstreamError) -> Retry {
    match err {
        UpstreamError::Throttled { retry_after } => Retry::Throttle(*retry_after),
        UpstreamError::Transport(_) => Retry::Backoff,
        UpstreamError::Client { .. } | UpstreamError::Server { .. } | UpstreamError::Decode(_) => {
            Retry::Stop
        }
    }
}

pub fn classify_store(err: &StoreError) -> Retry {
    if err.is_transient() {
        Retry::Backoff
    } else {
        Retry::Stop
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::upstream(&PipelineConfig::default())
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let backoff = policy().backoff;
        assert_eq!(backoff.delay(1), Duration::from_secs(1));
        assert_eq!(backoff.delay(2), Duration::from_secs(2));
        assert_eq!(backoff.delay(4), Duration::from_secs(8));
        assert_eq!(backoff.delay(9), Duration::from_secs(30));
        assert_eq!(backoff.delay(60), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = policy()
            .run(
                "test",
                None,
                move || async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(UpstreamError::Server { status: 503 })
                    } else {
                        Ok(7)
                    }
                },
                classify_listing,
            )
            .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_returns_immediately() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = policy()
            .run(
                "test",
                None,
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(UpstreamError::Client { status: 404 })
                },
                classify_detail,
            )
            .await;
        assert_eq!(result, Err(RetryError::Stopped(UpstreamError::Client { status: 404 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn throttles_share_the_attempt_budget() {
        let governor = RateGovernor::new(20, Duration::from_millis(1000), Duration::from_secs(120));
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();
        let result: Result<(), _> = policy()
            .run(
                "test",
                Some(&governor),
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(UpstreamError::Throttled {
                        retry_after: Some(Duration::from_secs(2)),
                    })
                },
                classify_detail,
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert!(matches!(
            result,
            Err(RetryError::Exhausted { attempts: 5, throttled_only: true, .. })
        ));
        // Four throttle waits between five attempts.
        assert!(Instant::now() - start >= Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn store_failures_use_fixed_delay() {
        let policy = RetryPolicy::persistence(&PipelineConfig::default());
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();
        let result: Result<(), _> = policy
            .run(
                "persist",
                None,
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(StoreError::Transient("connection reset".to_string()))
                },
                classify_store,
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(RetryError::Exhausted { throttled_only: false, .. })));
        let elapsed = Instant::now() - start;
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    }
}
