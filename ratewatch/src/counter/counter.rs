//! Concurrency-safe event accumulator with bounded recent history.
//!
//! `EventCounter` tallies every item its filter matches and keeps the most
//! recent matches in a capped ring. The total and the ring live behind a
//! single mutex so a snapshot always reflects one instant; readers never see
//! a total that disagrees with the ring's eviction state.
//!
//! # Thread Safety
//!
//! All methods take `&self`. Producers call `observe` from any number of
//! tasks or threads while the reporting task reads totals; both sides only
//! contend for the short critical section around the state pair.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::filter::EventFilter;
use super::source::ObservationSource;
use crate::config::DEFAULT_CAPACITY;

/// Point-in-time copy of counter state.
///
/// `recent` holds the newest matching items in arrival order (oldest first)
/// and never exceeds `capacity`; `total` counts every match ever observed,
/// so `total >= recent.len()` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot<T> {
    /// Total matching observations since creation (or restore).
    pub total: u64,
    /// Most recent matching items, oldest first.
    pub recent: Vec<T>,
    /// Ring capacity at the time of the snapshot.
    pub capacity: usize,
}

/// Counter state guarded as one unit so snapshots are never torn.
struct CounterState<T> {
    total: u64,
    recent: VecDeque<T>,
}

/// Concurrency-safe accumulator for classified events.
///
/// Items are pushed via [`observe`](EventCounter::observe); non-matching
/// items are ignored. Matching items increment the total and enter the
/// recent-history ring, evicting the oldest entry once the ring is full.
/// A capacity of 0 keeps the ring empty while the total still counts.
///
/// # Example
///
/// ```
/// use ratewatch::EventCounter;
///
/// let counter = EventCounter::with_capacity(2, |n: &u32| n % 2 == 0);
///
/// counter.observe(1);
/// counter.observe(2);
/// counter.observe(4);
/// counter.observe(6);
///
/// let snapshot = counter.snapshot();
/// assert_eq!(snapshot.total, 3);
/// assert_eq!(snapshot.recent, vec![4, 6]);
/// ```
pub struct EventCounter<T> {
    /// Classification predicate; non-matching items are ignored.
    filter: Box<dyn EventFilter<T>>,
    /// Ring capacity (0 disables the ring).
    capacity: usize,
    /// Total and ring behind one lock.
    state: Mutex<CounterState<T>>,
}

impl<T> EventCounter<T> {
    /// Create a counter with the default capacity.
    pub fn new<F>(filter: F) -> Self
    where
        F: EventFilter<T> + 'static,
    {
        Self::with_capacity(DEFAULT_CAPACITY, filter)
    }

    /// Create a counter with an explicit ring capacity.
    pub fn with_capacity<F>(capacity: usize, filter: F) -> Self
    where
        F: EventFilter<T> + 'static,
    {
        Self {
            filter: Box::new(filter),
            capacity,
            state: Mutex::new(CounterState {
                total: 0,
                recent: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// Rebuild a counter from a previously saved snapshot.
    ///
    /// The ring is trimmed to the snapshot's capacity (oldest entries
    /// dropped) and the total is raised to at least the ring length, so the
    /// counter's invariants hold even for a hand-edited snapshot.
    pub fn from_snapshot<F>(snapshot: CounterSnapshot<T>, filter: F) -> Self
    where
        F: EventFilter<T> + 'static,
    {
        let CounterSnapshot {
            total,
            recent,
            capacity,
        } = snapshot;

        let mut recent: VecDeque<T> = recent.into();
        while recent.len() > capacity {
            recent.pop_front();
        }
        let total = total.max(recent.len() as u64);

        Self {
            filter: Box::new(filter),
            capacity,
            state: Mutex::new(CounterState { total, recent }),
        }
    }

    /// Submit an item for counting.
    ///
    /// Non-matching items are a no-op. Matching items increment the total
    /// and join the ring, evicting the oldest entry when the ring is full.
    /// Never fails and never blocks beyond the state lock.
    pub fn observe(&self, item: T) {
        if !self.filter.matches(&item) {
            return;
        }

        let mut state = self.state.lock();
        state.total += 1;
        state.recent.push_back(item);

        // Trim to capacity (handles capacity 0 with no special case)
        while state.recent.len() > self.capacity {
            state.recent.pop_front();
        }
    }

    /// Total matching observations so far.
    pub fn total(&self) -> u64 {
        self.state.lock().total
    }

    /// Number of items currently in the recent-history ring.
    pub fn recent_count(&self) -> usize {
        self.state.lock().recent.len()
    }

    /// Configured ring capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> EventCounter<T> {
    /// Take a consistent copy of the counter state.
    ///
    /// The total and the ring are read under one lock acquisition, so the
    /// returned snapshot reflects a single instant.
    pub fn snapshot(&self) -> CounterSnapshot<T> {
        let state = self.state.lock();
        CounterSnapshot {
            total: state.total,
            recent: state.recent.iter().cloned().collect(),
            capacity: self.capacity,
        }
    }
}

impl<T: Send> ObservationSource for EventCounter<T> {
    fn observed_total(&self) -> u64 {
        self.state.lock().total
    }
}

impl<T> fmt::Debug for EventCounter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EventCounter")
            .field("total", &state.total)
            .field("recent_count", &state.recent.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
