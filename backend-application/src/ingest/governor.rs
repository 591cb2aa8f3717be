use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use backend_domain::PipelineConfig;
use tokio::sync::Mutex;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, warn};

use crate::Metrics;

/// Session-scoped sliding-window limiter shared by every upstream call of one request.
#[derive(Debug)]
pub struct RateGovernor {
    budget: usize,
    window: Duration,
    default_retry_after: Duration,
    state: Mutex<WindowState>,
    metrics: Option<Arc<Metrics>>,
}

#[derive(Debug, Default)]
struct WindowState {
    admitted: VecDeque<Instant>,
    throttled_until: Option<Instant>,
}

impl RateGovernor {
    pub fn new(budget: usize, window: Duration, default_retry_after: Duration) -> Self {
        Self {
            budget: budget.max(1),
            window,
            default_retry_after,
            state: Mutex::new(WindowState::default()),
            metrics: None,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.rate_budget,
            Duration::from_millis(config.rate_window_ms),
            Duration::from_secs(config.default_retry_after_secs),
        )
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Waits until a slot is free in the rolling window, then claims it.
    pub async fn acquire(&self) {
        loop {
            let wait_until = {
                let mut state = self.state.lock().await;
                let now = Instant::now();

                match state.throttled_until {
                    Some(until) if until > now => Some(until),
                    _ => {
                        state.throttled_until = None;
                        while let Some(front) = state.admitted.front() {
                            if now.duration_since(*front) >= self.window {
                                state.admitted.pop_front();
                            } else {
                                break;
                            }
                        }
                        if state.admitted.len() < self.budget {
                            state.admitted.push_back(now);
                            None
                        } else {
                            state.admitted.front().map(|oldest| *oldest + self.window)
                        }
                    }
                }
            };

            match wait_until {
                None => return,
                Some(until) => {
                    debug!(
                        wait_ms = until.saturating_duration_since(Instant::now()).as_millis() as u64,
                        "rate budget exhausted, waiting"
                    );
                    sleep_until(until).await;
                }
            }
        }
    }

    /// Pauses every caller of this governor for the upstream-supplied wait.
    pub async fn throttle(&self, retry_after: Option<Duration>) -> Duration {
        let wait = retry_after.unwrap_or(self.default_retry_after);
        if let Some(metrics) = &self.metrics {
            metrics.record_throttle();
        }
        {
            let mut state = self.state.lock().await;
            let until = Instant::now() + wait;
            state.throttled_until = Some(match state.throttled_until {
                Some(existing) if existing > until => existing,
                _ => until,
            });
        }
        warn!(wait_ms = wait.as_millis() as u64, "upstream throttled, pausing");
        sleep(wait).await;
        wait
    }
}
