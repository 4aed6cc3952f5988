//! Configuration surface for observers.
//!
//! This module defines `ObserverConfig`, the single configuration type shared
//! by the counting and reporting components. Counters consume `capacity`;
//! reporters consume `tick_interval` and `report_every_n_ticks`.

use std::time::Duration;

/// Default maximum number of recent matching items retained by a counter.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default interval between reporting-task ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of ticks between emitted reports.
///
/// With the default one-second tick this yields one report every ten seconds.
pub const DEFAULT_REPORT_EVERY_N_TICKS: u32 = 10;

/// Minimum tick interval accepted by the reporter.
///
/// The tokio interval timer rejects a zero period, so shorter configured
/// intervals are clamped to this floor.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for an observer: ring capacity and reporting cadence.
///
/// All fields are public and the type is builder-friendly; start from
/// `ObserverConfig::default()` and override with the `with_*` methods.
#[derive(Clone, Debug)]
pub struct ObserverConfig {
    /// Maximum recent matching items retained (0 disables the history ring).
    pub capacity: usize,

    /// Interval between reporting-task ticks.
    pub tick_interval: Duration,

    /// Number of ticks between emitted reports.
    pub report_every_n_ticks: u32,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tick_interval: DEFAULT_TICK_INTERVAL,
            report_every_n_ticks: DEFAULT_REPORT_EVERY_N_TICKS,
        }
    }
}

impl ObserverConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recent-history capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the tick interval.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Set how many ticks elapse between reports.
    pub fn with_report_every_n_ticks(mut self, ticks: u32) -> Self {
        self.report_every_n_ticks = ticks;
        self
    }

    /// Copy of this config with out-of-range values clamped.
    ///
    /// `report_every_n_ticks` is raised to at least 1 and `tick_interval` to
    /// at least [`MIN_TICK_INTERVAL`]. The reporter applies this before
    /// starting its tick task.
    pub fn normalized(&self) -> Self {
        Self {
            capacity: self.capacity,
            tick_interval: self.tick_interval.max(MIN_TICK_INTERVAL),
            report_every_n_ticks: self.report_every_n_ticks.max(1),
        }
    }

    /// Nominal interval between reports.
    ///
    /// This is `tick_interval * report_every_n_ticks` after clamping, and is
    /// the denominator for rate computation. The product saturates at
    /// `Duration::MAX` instead of overflowing for extreme tick intervals.
    pub fn reporting_interval(&self) -> Duration {
        self.tick_interval
            .max(MIN_TICK_INTERVAL)
            .checked_mul(self.report_every_n_ticks.max(1))
            .unwrap_or(Duration::MAX)
    }
}
