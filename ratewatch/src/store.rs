//! Optional persistence collaborator for counter snapshots.
//!
//! Embedders that want counter state to survive restarts implement
//! [`StateStore`] and wire it around the counter: load a snapshot at
//! startup, rebuild with `EventCounter::from_snapshot`, and save snapshots
//! whenever their policy says so. The crate ships an in-memory store; disk
//! and network backends belong to the embedder.

use parking_lot::Mutex;
use thiserror::Error;

use crate::counter::CounterSnapshot;

/// Errors from snapshot persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected or lost the snapshot.
    #[error("Store error: {0}")]
    Backend(String),
}

/// Loads and saves counter snapshots.
///
/// `load` returning `Ok(None)` means nothing has been saved yet; callers
/// start from an empty counter in that case.
pub trait StateStore<T>: Send + Sync {
    /// Load the most recently saved snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn load(&self) -> Result<Option<CounterSnapshot<T>>, StoreError>;

    /// Save a snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn save(&self, snapshot: &CounterSnapshot<T>) -> Result<(), StoreError>;
}

/// In-memory store holding the last saved snapshot.
#[derive(Debug)]
pub struct MemoryStore<T> {
    snapshot: Mutex<Option<CounterSnapshot<T>>>,
}

impl<T> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            snapshot: Mutex::new(None),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StateStore<T> for MemoryStore<T>
where
    T: Clone + Send,
{
    fn load(&self) -> Result<Option<CounterSnapshot<T>>, StoreError> {
        Ok(self.snapshot.lock().clone())
    }

    fn save(&self, snapshot: &CounterSnapshot<T>) -> Result<(), StoreError> {
        *self.snapshot.lock() = Some(snapshot.clone());
        Ok(())
    }
}
