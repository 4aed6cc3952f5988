//! Rate math and the emitted report type.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One reporting-interval measurement over an observation source.
///
/// Produced each time the reporter fires; not stored anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    /// Total at the previous report.
    pub previous_total: u64,
    /// Total at this report.
    pub current_total: u64,
    /// Length of the reporting interval in seconds.
    pub interval_seconds: f64,
    /// Observations per second over the interval.
    pub rate: f64,
}

impl RateSample {
    /// Measure the change between two totals over an interval.
    ///
    /// The rate is `delta / interval_seconds`. A zero-length interval yields
    /// a rate of 0.0 rather than dividing by zero, and a `previous_total`
    /// above `current_total` is treated as a delta of 0 (totals are
    /// monotonic, so a regression means the source was swapped out).
    pub fn new(previous_total: u64, current_total: u64, interval: Duration) -> Self {
        let interval_seconds = interval.as_secs_f64();
        let delta = current_total.saturating_sub(previous_total);
        let rate = if interval_seconds > 0.0 {
            delta as f64 / interval_seconds
        } else {
            0.0
        };

        Self {
            previous_total,
            current_total,
            interval_seconds,
            rate,
        }
    }

    /// Observations gained over the interval.
    pub fn delta(&self) -> u64 {
        self.current_total.saturating_sub(self.previous_total)
    }

    /// The emitted form of this sample.
    pub fn report(&self) -> RateReport {
        RateReport {
            rate: self.rate,
            total: self.current_total,
            delta: self.delta(),
        }
    }
}

/// Structured observation emitted to a sink once per reporting interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateReport {
    /// Observations per second over the last reporting interval.
    pub rate: f64,
    /// Total matching observations at the time of the report.
    pub total: u64,
    /// Observations gained since the previous report.
    pub delta: u64,
}

impl fmt::Display for RateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rate: {:.2}/s, total: {}, delta: {}",
            self.rate, self.total, self.delta
        )
    }
}
