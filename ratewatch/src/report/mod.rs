//! Periodic rate reporting.
//!
//! This module provides the reporting half of the observer:
//!
//! - `RateReporter` - lifecycle-managed tick task sampling a source
//! - `RateSample` / `RateReport` - the per-interval math and emitted record
//! - `ReportSink` - pluggable report destinations (`TracingSink`,
//!   `ChannelSink`)
//!
//! The reporter reads a monotonic total through `ObservationSource`, turns
//! the delta since the previous report into a per-second rate, and pushes a
//! `{rate, total, delta}` record to its sink once per reporting interval.

mod reporter;
mod sample;
mod sink;

pub use reporter::{RateReporter, ReporterError};
pub use sample::{RateReport, RateSample};
pub use sink::{ChannelSink, ReportSink, SharedReportSink, SinkError, TracingSink};
