//! Periodic rate reporting over an observation source.
//!
//! The [`RateReporter`] owns a background tick task: the timer fires every
//! `tick_interval`, and every `report_every_n_ticks`-th firing samples the
//! source, computes the delta-based rate, and emits a [`RateReport`] to the
//! sink.
//!
//! # Lifecycle
//!
//! `Idle -> Running -> Stopped`, with Stopped terminal. `start` rejects a
//! second call while running and any call after `stop`; `stop` is idempotent
//! and guarantees no new tick starts once the cancellation is observed.
//!
//! # Rate semantics
//!
//! Rates are computed against the nominal reporting interval
//! (`tick_interval * report_every_n_ticks`), not wall-clock drift, matching
//! the fixed-cadence sampling the reports describe. Ticks missed under
//! scheduler delay are skipped, never bursted to catch up.
//!
//! # Example
//!
//! ```ignore
//! use ratewatch::{
//!     EventCounter, MatchAll, ObservationSource, ObserverConfig, RateReporter, TracingSink,
//! };
//! use std::sync::Arc;
//!
//! let counter = Arc::new(EventCounter::with_capacity(100, MatchAll));
//! let reporter = RateReporter::new(
//!     Arc::clone(&counter) as Arc<dyn ObservationSource>,
//!     Arc::new(TracingSink::new()),
//!     ObserverConfig::default(),
//! );
//!
//! let handle = reporter.start()?;
//! counter.observe(event);
//!
//! // Later
//! reporter.stop();
//! handle.await?;
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::sample::RateSample;
use super::sink::ReportSink;
use crate::config::ObserverConfig;
use crate::counter::ObservationSource;

/// Errors from reporter lifecycle misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReporterError {
    /// `start` was called while the reporter is already running.
    #[error("Reporter is already running")]
    AlreadyRunning,

    /// `start` was called on a stopped reporter; Stopped is terminal.
    #[error("Reporter has been stopped")]
    Stopped,
}

/// Reporter lifecycle; Stopped is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    Stopped,
}

/// Periodic reporter emitting delta-based rates for one observation source.
pub struct RateReporter {
    /// Source sampled once per reporting interval.
    source: Arc<dyn ObservationSource>,

    /// Destination for emitted reports.
    sink: Arc<dyn ReportSink>,

    /// Normalized configuration (cadence clamped to usable values).
    config: ObserverConfig,

    /// Lifecycle state guarding against duplicate tick tasks.
    lifecycle: Mutex<Lifecycle>,

    /// Cancellation for the tick task.
    cancel: CancellationToken,
}

impl RateReporter {
    /// Create a reporter over a source and sink.
    ///
    /// The config is normalized on the way in; see
    /// [`ObserverConfig::normalized`].
    pub fn new(
        source: Arc<dyn ObservationSource>,
        sink: Arc<dyn ReportSink>,
        config: ObserverConfig,
    ) -> Self {
        Self {
            source,
            sink,
            config: config.normalized(),
            lifecycle: Mutex::new(Lifecycle::Idle),
            cancel: CancellationToken::new(),
        }
    }

    /// Start the periodic reporting task.
    ///
    /// Spawns the tick loop on the ambient tokio runtime and returns its
    /// join handle so embedders can await teardown after [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// - [`ReporterError::AlreadyRunning`] if the reporter is running
    /// - [`ReporterError::Stopped`] if the reporter was stopped
    pub fn start(&self) -> Result<JoinHandle<()>, ReporterError> {
        {
            let mut lifecycle = self.lifecycle.lock();
            match *lifecycle {
                Lifecycle::Running => return Err(ReporterError::AlreadyRunning),
                Lifecycle::Stopped => return Err(ReporterError::Stopped),
                Lifecycle::Idle => *lifecycle = Lifecycle::Running,
            }
        }

        debug!(
            tick_interval_ms = self.config.tick_interval.as_millis() as u64,
            report_every_n_ticks = self.config.report_every_n_ticks,
            "Rate reporter starting"
        );

        let source = Arc::clone(&self.source);
        let sink = Arc::clone(&self.sink);
        let config = self.config.clone();
        let cancel = self.cancel.clone();

        Ok(tokio::spawn(run_tick_loop(source, sink, config, cancel)))
    }

    /// Stop the reporter.
    ///
    /// Idempotent: repeated calls, or a call on a never-started reporter,
    /// are no-ops beyond making the state terminal. Safe to call while a
    /// tick is in flight; no new tick starts after the cancellation is
    /// observed.
    pub fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock();
        if *lifecycle == Lifecycle::Stopped {
            return;
        }

        *lifecycle = Lifecycle::Stopped;
        self.cancel.cancel();
        debug!("Rate reporter stopped");
    }

    /// Whether the reporting task is currently running.
    pub fn is_running(&self) -> bool {
        *self.lifecycle.lock() == Lifecycle::Running
    }
}

impl fmt::Debug for RateReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateReporter")
            .field("config", &self.config)
            .field("lifecycle", &*self.lifecycle.lock())
            .finish_non_exhaustive()
    }
}

/// Tick loop: fires every `tick_interval`, reports every Nth tick.
///
/// The interval's immediately-ready first tick is consumed before the loop
/// so the first report lands a full reporting interval after start. Missed
/// ticks are skipped rather than bursted.
async fn run_tick_loop(
    source: Arc<dyn ObservationSource>,
    sink: Arc<dyn ReportSink>,
    config: ObserverConfig,
    cancel: CancellationToken,
) {
    info!("Rate reporter task starting");

    let mut interval = tokio::time::interval(config.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await;

    let reporting_interval = config.reporting_interval();
    let report_every = u64::from(config.report_every_n_ticks);
    let mut previous_total = 0u64;
    let mut tick_count = 0u64;

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                info!("Rate reporter task shutting down");
                break;
            }

            _ = interval.tick() => {
                tick_count += 1;
                if tick_count % report_every != 0 {
                    continue;
                }

                // Sample first; emission happens outside any lock
                let current_total = source.observed_total();
                let sample = RateSample::new(previous_total, current_total, reporting_interval);
                previous_total = current_total;

                let report = sample.report();
                if let Err(error) = sink.emit(&report) {
                    warn!(error = %error, "Failed to emit rate report");
                }
            }
        }
    }

    info!("Rate reporter task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::{EventCounter, MatchAll};
    use crate::report::sample::RateReport;
    use crate::report::sink::SinkError;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    /// Source backed by a settable atomic total.
    #[derive(Default)]
    struct MockSource {
        total: AtomicU64,
    }

    impl MockSource {
        fn add(&self, n: u64) {
            self.total.fetch_add(n, Ordering::Relaxed);
        }
    }

    impl ObservationSource for MockSource {
        fn observed_total(&self) -> u64 {
            self.total.load(Ordering::Relaxed)
        }
    }

    /// Sink that records every report it receives.
    #[derive(Default)]
    struct CollectingSink {
        reports: Mutex<Vec<RateReport>>,
    }

    impl CollectingSink {
        fn reports(&self) -> Vec<RateReport> {
            self.reports.lock().clone()
        }
    }

    impl ReportSink for CollectingSink {
        fn emit(&self, report: &RateReport) -> Result<(), SinkError> {
            self.reports.lock().push(*report);
            Ok(())
        }
    }

    /// Sink that fails every emission but counts the attempts.
    #[derive(Default)]
    struct FailingSink {
        attempts: AtomicU64,
    }

    impl ReportSink for FailingSink {
        fn emit(&self, _report: &RateReport) -> Result<(), SinkError> {
            self.attempts.fetch_add(1, Ordering::Relaxed);
            Err(SinkError::Other("sink offline".to_string()))
        }
    }

    fn reporter_with(
        source: Arc<dyn ObservationSource>,
        sink: Arc<dyn ReportSink>,
    ) -> RateReporter {
        RateReporter::new(source, sink, ObserverConfig::default())
    }

    #[tokio::test]
    async fn test_start_twice_returns_already_running() {
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(CollectingSink::default());
        let reporter = reporter_with(source, sink);

        let handle = reporter.start().expect("first start should succeed");
        assert!(reporter.is_running());
        assert_eq!(reporter.start().unwrap_err(), ReporterError::AlreadyRunning);

        reporter.stop();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_start_after_stop_returns_stopped() {
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(CollectingSink::default());
        let reporter = reporter_with(source, sink);

        let handle = reporter.start().unwrap();
        reporter.stop();
        handle.await.unwrap();

        assert_eq!(reporter.start().unwrap_err(), ReporterError::Stopped);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(CollectingSink::default());
        let reporter = reporter_with(source, sink);

        let handle = reporter.start().unwrap();
        reporter.stop();
        reporter.stop();
        reporter.stop();

        assert!(!reporter.is_running());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_without_start_is_terminal() {
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(CollectingSink::default());
        let reporter = reporter_with(source, sink);

        reporter.stop();
        assert_eq!(reporter.start().unwrap_err(), ReporterError::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_carries_rate_total_delta() {
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(CollectingSink::default());
        let reporter = reporter_with(source.clone(), sink.clone());

        source.add(25);
        let handle = reporter.start().unwrap();

        // Default cadence: first report fires at t=10s
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].total, 25);
        assert_eq!(reports[0].delta, 25);
        assert!((reports[0].rate - 2.5).abs() < 1e-9);

        reporter.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_delta_resets_between_reports() {
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(CollectingSink::default());
        let reporter = reporter_with(source.clone(), sink.clone());

        source.add(40);
        let handle = reporter.start().unwrap();

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        source.add(15);
        tokio::time::sleep(Duration::from_secs(10)).await;

        let reports = sink.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].delta, 40);
        assert_eq!(reports[1].total, 55);
        assert_eq!(reports[1].delta, 15);
        assert!((reports[1].rate - 1.5).abs() < 1e-9);

        reporter.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_every_nth_tick() {
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(CollectingSink::default());
        let config = ObserverConfig::new()
            .with_tick_interval(Duration::from_secs(1))
            .with_report_every_n_ticks(2);
        let reporter = RateReporter::new(source.clone(), sink.clone(), config);

        let handle = reporter.start().unwrap();
        tokio::time::sleep(Duration::from_millis(6_500)).await;

        // Reports at t=2s, 4s, 6s
        assert_eq!(sink.reports().len(), 3);

        reporter.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_failure_keeps_reporter_ticking() {
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(FailingSink::default());
        let reporter = reporter_with(source.clone(), sink.clone());

        let handle = reporter.start().unwrap();
        tokio::time::sleep(Duration::from_millis(20_500)).await;

        // Both reports were attempted despite every emission failing
        assert_eq!(sink.attempts.load(Ordering::Relaxed), 2);

        reporter.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_reports_after_stop() {
        let source = Arc::new(MockSource::default());
        let sink = Arc::new(CollectingSink::default());
        let reporter = reporter_with(source.clone(), sink.clone());

        source.add(10);
        let handle = reporter.start().unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        reporter.stop();
        handle.await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(sink.reports().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_counter_drives_reporter() {
        let counter = Arc::new(EventCounter::with_capacity(8, MatchAll));
        let sink = Arc::new(CollectingSink::default());
        let reporter = RateReporter::new(
            Arc::clone(&counter) as Arc<dyn ObservationSource>,
            sink.clone(),
            ObserverConfig::default(),
        );

        for i in 0..7u32 {
            counter.observe(i);
        }

        let handle = reporter.start().unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].total, 7);

        reporter.stop();
        handle.await.unwrap();
    }
}
