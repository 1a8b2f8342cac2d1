//! Snapshot storage scoped to one page session.

use std::sync::Arc;

use chatsnap_core::Snapshot;
use parking_lot::RwLock;

/// Holds the latest snapshot of a page session.
///
/// Written once per extraction pass, read by the responder. A new pass
/// replaces the previous snapshot wholesale.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshot: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot.
    pub fn set(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write() = Some(snapshot.clone());
        snapshot
    }

    /// Current snapshot, if extraction has completed.
    pub fn get(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.snapshot.read().is_some()
    }
}
