use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use seatwatch_types::{SectionId, SectionSnapshot};

use crate::error::{StoreError, StoreResult};
use crate::record::{CycleChanges, CycleRecord, CycleUpdate};

/// In-memory store of tracked sections and their change history.
///
/// All state sits behind one `RwLock`, so a cycle result is published
/// atomically with respect to readers. Snapshots are cloned out on read.
pub struct TrackingStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    tracked: BTreeMap<SectionId, SectionSnapshot>,
    history: Vec<CycleRecord>,
}

impl TrackingStore {
    /// Seed the store with initial snapshots.
    ///
    /// Snapshots sharing an identity collapse to the first one seen.
    pub fn seed(snapshots: impl IntoIterator<Item = SectionSnapshot>) -> Self {
        let mut tracked = BTreeMap::new();
        for snapshot in snapshots {
            let id = snapshot.id().clone();
            if tracked.contains_key(&id) {
                warn!(section = %id, "duplicate seed section collapsed");
                continue;
            }
            tracked.insert(id, snapshot);
        }
        debug!(tracked = tracked.len(), "tracking store seeded");
        Self {
            inner: RwLock::new(StoreState {
                tracked,
                history: Vec::new(),
            }),
        }
    }

    /// Current authoritative snapshot of a section.
    pub fn snapshot_of(&self, id: &SectionId) -> Option<SectionSnapshot> {
        self.inner
            .read()
            .expect("lock poisoned")
            .tracked
            .get(id)
            .cloned()
    }

    /// All tracked identities, in identity order.
    pub fn identities(&self) -> Vec<SectionId> {
        self.inner
            .read()
            .expect("lock poisoned")
            .tracked
            .keys()
            .cloned()
            .collect()
    }

    /// All current snapshots, in identity order.
    pub fn snapshots(&self) -> Vec<SectionSnapshot> {
        self.inner
            .read()
            .expect("lock poisoned")
            .tracked
            .values()
            .cloned()
            .collect()
    }

    /// Number of tracked sections.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").tracked.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").tracked.is_empty()
    }

    /// Apply the result of one cycle.
    ///
    /// Every update with at least one change replaces the stored snapshot
    /// wholesale, and all such updates are recorded together as a single
    /// history entry stamped `timestamp`. Updates without changes are
    /// ignored. Returns the appended record, or `None` for a quiet cycle.
    ///
    /// The whole result is validated before anything is written: an update
    /// for an untracked section, or one whose snapshot is filed under the
    /// wrong key, fails the call with no effect.
    pub fn apply_cycle_result(
        &self,
        timestamp: DateTime<Local>,
        updates: BTreeMap<SectionId, CycleUpdate>,
    ) -> StoreResult<Option<CycleRecord>> {
        let mut state = self.inner.write().expect("lock poisoned");

        for (id, update) in &updates {
            if !state.tracked.contains_key(id) {
                return Err(StoreError::UnknownSection(id.clone()));
            }
            if update.snapshot.id() != id {
                return Err(StoreError::MisfiledSnapshot {
                    key: id.clone(),
                    actual: update.snapshot.id().clone(),
                });
            }
        }

        let mut changes = CycleChanges::new();
        for (id, update) in updates.into_iter().filter(|(_, u)| u.is_changed()) {
            state.tracked.insert(id.clone(), update.snapshot);
            changes.insert(id, update.changes);
        }

        if changes.is_empty() {
            return Ok(None);
        }

        let record = CycleRecord { timestamp, changes };
        state.history.push(record.clone());
        debug!(
            sections = record.changes.len(),
            changes = record.change_count(),
            history_len = state.history.len(),
            "cycle result applied"
        );
        Ok(Some(record))
    }

    /// Read-only copy of the change history, oldest first.
    pub fn history(&self) -> Vec<CycleRecord> {
        self.inner.read().expect("lock poisoned").history.clone()
    }

    /// Number of history records.
    pub fn history_len(&self) -> usize {
        self.inner.read().expect("lock poisoned").history.len()
    }

    /// Truncate the history. Tracked snapshots are left untouched.
    pub fn clear_history(&self) {
        self.inner.write().expect("lock poisoned").history.clear();
    }
}

impl std::fmt::Debug for TrackingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("lock poisoned");
        f.debug_struct("TrackingStore")
            .field("tracked", &state.tracked.len())
            .field("history", &state.history.len())
            .finish()
    }
}
