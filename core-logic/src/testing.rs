//! Deterministic stand-ins for the clock and the variant picker.

use crate::traits::{Sleeper, VariantPicker};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Records every requested sleep and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn count_of(&self, duration: Duration) -> usize {
        self.calls().iter().filter(|d| **d == duration).count()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(duration);
        }
        tokio::task::yield_now().await;
    }
}

/// Always picks the same position, clamped to the available range.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker {
    index: Option<usize>,
}

impl FixedPicker {
    pub fn new(index: usize) -> Self {
        Self { index: Some(index) }
    }

    pub fn first() -> Self {
        Self::new(0)
    }

    pub fn last() -> Self {
        Self { index: None }
    }
}

impl VariantPicker for FixedPicker {
    fn pick(&self, n: usize) -> usize {
        let last = n.saturating_sub(1);
        self.index.map_or(last, |i| i.min(last))
    }
}
