use crate::traits::VariantPicker;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub rpc_endpoint: String,
    pub chain_id: u64,
    pub symbol: String,
}

/// Bounds for [`crate::RetryPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(rename = "maxAttempts", alias = "maxattempts", default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff in milliseconds, multiplied by the attempt number.
    #[serde(
        rename = "delayBetweenRetries",
        alias = "delaybetweenretries",
        default = "default_retry_delay"
    )]
    pub delay_between_retries: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    5_000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_between_retries: default_retry_delay(),
        }
    }
}

impl RetrySettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.delay_between_retries)
    }
}

/// Inclusive jitter bounds in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: 5_000,
            max: 15_000,
        }
    }
}

impl DelayRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Picks a duration uniformly from `min..=max`. A reversed range yields `min`.
    pub fn pick(&self, picker: &dyn VariantPicker) -> Duration {
        if self.max <= self.min {
            return Duration::from_millis(self.min);
        }
        let span = (self.max - self.min + 1) as usize;
        Duration::from_millis(self.min + picker.pick(span) as u64)
    }
}
