//! Event counting with bounded recent history.
//!
//! This module provides the accumulator half of the observer:
//!
//! - `EventCounter` - concurrency-safe total plus a capped recent-items ring
//! - `EventFilter` - injected classification predicate (closures work)
//! - `ObservationSource` - the narrow seam rate reporters sample
//!
//! Producers push items via `observe`; anything the filter rejects is
//! ignored. Consumers either pull a full `snapshot` or, like the reporter,
//! just read the running total through `ObservationSource`.
//!
//! # Example
//!
//! ```
//! use ratewatch::EventCounter;
//!
//! let counter = EventCounter::with_capacity(3, |s: &String| s.contains("relay"));
//!
//! counter.observe("via relay-7".to_string());
//! counter.observe("direct".to_string());
//!
//! assert_eq!(counter.total(), 1);
//! ```

mod counter;
mod filter;
mod source;

pub use counter::{CounterSnapshot, EventCounter};
pub use filter::{EventFilter, MatchAll};
pub use source::{ObservationSource, SharedObservationSource};
