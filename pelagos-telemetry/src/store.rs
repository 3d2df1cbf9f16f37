//! Append-only event store trait and the in-memory implementation.

use ::async_trait::async_trait;
use pelagos_core::{EventId, PelagosError, PelagosResult, StorageError, TagEvent};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Append-only persistence for validated tag events.
///
/// Implementations must serialize concurrent appends: no lost writes, no
/// duplicate ids. There is no update or delete in the contract.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append a validated event.
    async fn append(&self, event: TagEvent) -> PelagosResult<()>;

    /// Most-recent-first listing by event `timestamp`, bounded by `limit`.
    ///
    /// The event's own timestamp is the recency key, so a delayed uplink
    /// carrying an old reading files into its proper place instead of
    /// heading the list. Ties resolve by insertion order (the later
    /// arrival first). `limit = 0` and an empty store both yield an empty
    /// vec, never an error.
    async fn list_recent(&self, limit: usize) -> PelagosResult<Vec<TagEvent>>;

    /// Number of stored events.
    async fn len(&self) -> PelagosResult<usize>;
}

/// In-memory event store.
///
/// A `Vec` in arrival order behind an `RwLock`; suitable for tests,
/// development, and single-node deployments. Persistent backends implement
/// the same trait.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<TagEvent>>>,
    ids: Arc<RwLock<HashSet<EventId>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored events.
    pub fn clear(&self) -> PelagosResult<()> {
        self.events
            .write()
            .map_err(|_| PelagosError::Storage(StorageError::LockPoisoned))?
            .clear();
        self.ids
            .write()
            .map_err(|_| PelagosError::Storage(StorageError::LockPoisoned))?
            .clear();
        Ok(())
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, event: TagEvent) -> PelagosResult<()> {
        let mut ids = self
            .ids
            .write()
            .map_err(|_| PelagosError::Storage(StorageError::LockPoisoned))?;
        if !ids.insert(event.id) {
            return Err(PelagosError::Storage(StorageError::DuplicateId {
                id: event.id,
            }));
        }
        self.events
            .write()
            .map_err(|_| PelagosError::Storage(StorageError::LockPoisoned))?
            .push(event);
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> PelagosResult<Vec<TagEvent>> {
        let events = self
            .events
            .read()
            .map_err(|_| PelagosError::Storage(StorageError::LockPoisoned))?;
        // Reverse arrival order, then stable-sort by the event timestamp:
        // equal timestamps keep the later arrival first.
        let mut recent: Vec<TagEvent> = events.iter().rev().cloned().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn len(&self) -> PelagosResult<usize> {
        let events = self
            .events
            .read()
            .map_err(|_| PelagosError::Storage(StorageError::LockPoisoned))?;
        Ok(events.len())
    }
}

// ============================================================================
// TESTS
// ============================================================================
