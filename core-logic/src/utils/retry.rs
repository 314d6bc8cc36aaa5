use crate::config::RetrySettings;
use crate::error::{Classify, ErrorKind};
use crate::traits::{Sleeper, TokioSleeper};
use crate::utils::logger::clean_error_message;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bounded retry with linear backoff and an error-class short-circuit.
///
/// Attempt 1 runs immediately. After failed attempt `n` the policy waits
/// `base_delay * n` before attempt `n + 1`. Only [`ErrorKind::Transient`]
/// failures are retried; the final error returned is the last one observed.
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .finish()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(settings.max_attempts, settings.base_delay())
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay taken after failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Runs `action` until it succeeds, fails with a non-retryable kind, or
    /// the attempt budget is spent. `actor` is the masked wallet (or a fixed
    /// label) every log line is attributed to.
    pub async fn run<T, E, F, Fut>(
        &self,
        actor: &str,
        operation: &str,
        mut action: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + Display,
    {
        let mut attempt = 1;
        loop {
            let err = match action().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(wallet = actor, "{} succeeded on attempt {}", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            let reason = clean_error_message(&err.to_string());
            match err.kind() {
                ErrorKind::InsufficientFunds => {
                    warn!(
                        wallet = actor,
                        "Insufficient funds, skipping retries for {}: {}", operation, reason
                    );
                    return Err(err);
                }
                ErrorKind::RateLimited => {
                    info!(wallet = actor, "{} rate limited, not retrying", operation);
                    return Err(err);
                }
                ErrorKind::Invalid => {
                    warn!(wallet = actor, "{} failed permanently: {}", operation, reason);
                    return Err(err);
                }
                ErrorKind::Transient => {}
            }

            if attempt >= self.max_attempts {
                warn!(
                    wallet = actor,
                    "{} FAILED after {} attempts: {}", operation, attempt, reason
                );
                return Err(err);
            }

            let delay = self.delay_for(attempt);
            warn!(
                wallet = actor,
                "{} attempt {}/{} failed: {}. Waiting {}ms before next attempt",
                operation,
                attempt,
                self.max_attempts,
                reason,
                delay.as_millis()
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}
