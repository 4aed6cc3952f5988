//! Sampling seam between counters and rate reporters.
//!
//! The reporter only needs a monotonic total to compute deltas, so it
//! depends on this minimal trait rather than on a concrete counter type.

use std::sync::Arc;

/// Exposes a monotonically non-decreasing observation total.
///
/// Consumers calculate rates from the delta between consecutive calls, so
/// implementations must never let the total go backwards while the source
/// lives.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the reporting task reads the total
/// from a background task while producers keep observing.
pub trait ObservationSource: Send + Sync {
    /// Total matching observations recorded so far.
    fn observed_total(&self) -> u64;
}

/// Shared handle to an observation source.
pub type SharedObservationSource = Arc<dyn ObservationSource>;
