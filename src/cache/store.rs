//! Current-snapshot holder.
//!
//! Readers get an `Arc<Snapshot>` without taking a lock; a replace swaps the pointer.
//! Readers that loaded the previous snapshot keep it alive until they drop their `Arc`.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::snapshot::Snapshot;

/// Holds the servable [`Snapshot`] behind an atomically swappable reference.
pub struct CacheStore {
    current: ArcSwap<Snapshot>,
}

impl CacheStore {
    /// Creates a store holding an empty snapshot.
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::empty())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// Returns the current snapshot. Never blocks.
    #[inline]
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Makes `snapshot` current and returns the one it replaced.
    ///
    /// Callers must serialize replaces; see
    /// [`SyncOrchestrator`](crate::sync::SyncOrchestrator).
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.current.swap(Arc::new(snapshot))
    }

    /// Number of records in the current snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("records", &self.len())
            .finish()
    }
}
