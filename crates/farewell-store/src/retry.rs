use std::future::Future;
use std::time::Duration;

use farewell_config::RetryConfig;
use farewell_core::SyncError;
use rand::Rng;
use tracing::{debug, warn};

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    /// Upper bound of random extra pause added to `delay`.
    pub jitter: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            jitter: None,
        }
    }

    /// Single attempt, no pause.
    pub fn once() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: config.delay(),
            jitter: config.jitter(),
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Run `op` until it succeeds or attempts run out; returns the last error.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, SyncError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, SyncError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(label, attempt, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) if attempt < max_attempts => {
                    warn!(label, attempt, max_attempts, %error, "attempt failed, retrying");
                    let pause = self.pause();
                    if !pause.is_zero() {
                        tokio::time::sleep(pause).await;
                    }
                    attempt += 1;
                }
                Err(error) => {
                    warn!(label, attempt, max_attempts, %error, "attempts exhausted");
                    return Err(error);
                }
            }
        }
    }

    fn pause(&self) -> Duration {
        match self.jitter {
            Some(jitter) if !jitter.is_zero() => {
                let extra_ms = rand::rng().random_range(0..=jitter.as_millis() as u64);
                self.delay + Duration::from_millis(extra_ms)
            }
            _ => self.delay,
        }
    }
}
