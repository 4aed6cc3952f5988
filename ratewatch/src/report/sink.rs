//! Report emission seam and the built-in sinks.
//!
//! The reporter hands each finished report to a `ReportSink`. Sinks must
//! never block the reporting task; failures are returned to the reporter,
//! which logs them and keeps ticking.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;

use super::sample::RateReport;

/// Errors that can occur while emitting a report.
#[derive(Debug, Error)]
pub enum SinkError {
    /// All receivers for a channel sink have been dropped.
    #[error("Report channel closed: all receivers dropped")]
    Closed,

    /// Sink-specific failure.
    #[error("Sink error: {0}")]
    Other(String),
}

/// Destination for periodic rate reports.
///
/// Implementations must be `Send + Sync` and must not block; emission runs
/// on the reporting task between timer ticks.
pub trait ReportSink: Send + Sync {
    /// Deliver one report.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` when the destination is unavailable. The reporter
    /// swallows the error with a diagnostic and continues ticking.
    fn emit(&self, report: &RateReport) -> Result<(), SinkError>;
}

/// Shared handle to a report sink.
pub type SharedReportSink = Arc<dyn ReportSink>;

/// Sink that logs each report as a structured tracing event.
///
/// The library never installs a subscriber; embedders decide where these
/// events go.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a tracing sink.
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for TracingSink {
    fn emit(&self, report: &RateReport) -> Result<(), SinkError> {
        info!(
            rate = report.rate,
            total = report.total,
            delta = report.delta,
            "Observation rate report"
        );
        Ok(())
    }
}

/// Sink that forwards reports to in-process consumers over a channel.
///
/// The channel is unbounded so emission never blocks the reporting task.
/// Once every receiver is gone, `emit` returns [`SinkError::Closed`].
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RateReport>,
}

impl ChannelSink {
    /// Create a sink and the receiver consumers read reports from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RateReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ReportSink for ChannelSink {
    fn emit(&self, report: &RateReport) -> Result<(), SinkError> {
        self.tx.send(*report).map_err(|_| SinkError::Closed)
    }
}
