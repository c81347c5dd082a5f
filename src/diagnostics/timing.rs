//! Per-pattern timing sinks for the decoder.

use std::sync::Mutex;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;

use super::ErrorCategory;

/// Receives the latency of every pattern attempt.
pub trait PatternTimer {
    fn record(&self, category: ErrorCategory, pattern: &str, elapsed: Duration);
}

/// Discards all measurements.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTimer;

impl PatternTimer for NoopTimer {
    fn record(&self, _category: ErrorCategory, _pattern: &str, _elapsed: Duration) {}
}

/// Average latency of one pattern
#[derive(Debug, Clone, Serialize)]
pub struct PatternTiming {
    pub category: ErrorCategory,
    pub pattern: String,
    pub attempts: usize,
    pub average_micros: f64,
}

/// Records every measurement, keyed by category and pattern name.
#[derive(Debug, Default)]
pub struct PatternTimings {
    samples: Mutex<IndexMap<(ErrorCategory, String), Vec<Duration>>>,
}

impl PatternTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Averages in first-recorded order.
    pub fn averages(&self) -> Vec<PatternTiming> {
        let samples = match self.samples.lock() {
            Ok(samples) => samples,
            Err(poisoned) => poisoned.into_inner(),
        };
        samples
            .iter()
            .map(|((category, pattern), durations)| {
                let total: Duration = durations.iter().sum();
                PatternTiming {
                    category: *category,
                    pattern: pattern.clone(),
                    attempts: durations.len(),
                    average_micros: total.as_secs_f64() * 1_000_000.0 / durations.len() as f64,
                }
            })
            .collect()
    }
}

impl PatternTimer for PatternTimings {
    fn record(&self, category: ErrorCategory, pattern: &str, elapsed: Duration) {
        let mut samples = match self.samples.lock() {
            Ok(samples) => samples,
            Err(poisoned) => poisoned.into_inner(),
        };
        samples
            .entry((category, pattern.to_string()))
            .or_default()
            .push(elapsed);
    }
}
