//! RateWatch - Bounded-window rate observation
//!
//! This library provides a small embeddable core for watching a stream of
//! events: classify and count the ones that match a predicate, keep a capped
//! ring of the most recent matches, and report a smoothed per-second rate on
//! a fixed cadence.
//!
//! # Components
//!
//! - [`EventCounter`] - concurrency-safe total plus bounded recent history,
//!   fed through an injected [`EventFilter`]
//! - [`RateReporter`] - background task emitting `{rate, total, delta}`
//!   reports to a [`ReportSink`] every reporting interval
//! - [`StatsRegistry`] - pull-based aggregation over named counters
//! - [`StateStore`] - optional persistence seam for counter snapshots
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ratewatch::{
//!     EventCounter, ObservationSource, ObserverConfig, RateReporter, TracingSink,
//! };
//!
//! let config = ObserverConfig::default();
//! let counter = Arc::new(EventCounter::with_capacity(
//!     config.capacity,
//!     |comment: &String| comment.to_lowercase().contains("relay"),
//! ));
//!
//! let reporter = RateReporter::new(
//!     Arc::clone(&counter) as Arc<dyn ObservationSource>,
//!     Arc::new(TracingSink::new()),
//!     config,
//! );
//! let handle = reporter.start()?;
//!
//! // Producers push items from anywhere
//! counter.observe("via relay-7".to_string());
//!
//! // Shut down when the embedding application stops
//! reporter.stop();
//! handle.await?;
//! ```
//!
//! # Thread Safety
//!
//! Every public type is safe to share behind an `Arc`. Counter state is
//! guarded as one unit so snapshots are never torn, and producers never
//! block on the reporting task beyond the short state lock.

pub mod config;
pub mod counter;
pub mod registry;
pub mod report;
pub mod store;

pub use config::ObserverConfig;
pub use counter::{
    CounterSnapshot, EventCounter, EventFilter, MatchAll, ObservationSource,
    SharedObservationSource,
};
pub use registry::{StatsProducer, StatsRegistry};
pub use report::{
    ChannelSink, RateReport, RateReporter, RateSample, ReportSink, ReporterError, SharedReportSink,
    SinkError, TracingSink,
};
pub use store::{MemoryStore, StateStore, StoreError};
