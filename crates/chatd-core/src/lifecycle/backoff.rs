//! Exponential backoff with jitter, and a retry loop built on it.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{info, warn};

/// Exponential backoff parameters.
///
/// The nth retry waits roughly `initial_interval * multiplier^(n-1)`, capped
/// at `max_interval`, then randomized by `±randomization_factor`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    /// Fraction of the delay used as jitter range (0.0 disables jitter).
    pub randomization_factor: f64,
    /// Give up once this much time has passed. `None` retries forever.
    pub max_elapsed_time: Option<Duration>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            multiplier: 1.5,
            max_interval: Duration::from_secs(60),
            randomization_factor: 0.5,
            max_elapsed_time: None,
        }
    }
}

impl BackoffPolicy {
    /// Set the elapsed-time limit.
    pub fn with_max_elapsed_time(mut self, limit: Option<Duration>) -> Self {
        self.max_elapsed_time = limit;
        self
    }

    /// Delay before retry number `attempt` (1-based). Attempt 0 is immediate.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base_ms = self.initial_interval.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped_ms = base_ms.min(self.max_interval.as_millis() as f64);

        let jitter_range = capped_ms * self.randomization_factor.clamp(0.0, 1.0);
        let delay_ms = if jitter_range >= 1.0 {
            rand::thread_rng().gen_range((capped_ms - jitter_range)..=(capped_ms + jitter_range))
        } else {
            capped_ms
        };

        Duration::from_millis(delay_ms.max(0.0) as u64)
    }
}

/// Run `op` until it succeeds, sleeping between attempts per `policy`.
///
/// Returns the last error only when `policy.max_elapsed_time` is set and the
/// next delay would exceed it; with no limit this never returns an error.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &BackoffPolicy,
    what: &str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(resource = what, attempts = attempt + 1, "succeeded after retrying");
                }
                return Ok(value);
            }
            Err(err) => {
                attempt = attempt.saturating_add(1);
                let delay = policy.delay(attempt);

                if let Some(limit) = policy.max_elapsed_time {
                    if started.elapsed() + delay > limit {
                        warn!(resource = what, attempt, error = %err, "giving up after retry limit");
                        return Err(err);
                    }
                }

                warn!(
                    resource = what,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
