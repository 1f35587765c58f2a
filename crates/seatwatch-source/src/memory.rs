use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use tracing::trace;

use seatwatch_types::{SectionId, SectionSnapshot};

use crate::error::{FetchError, FetchResult};
use crate::source::SnapshotSource;

/// In-memory snapshot source.
///
/// Holds the "live" snapshot of each section behind a `RwLock`; callers
/// mutate it to simulate the outside world changing. Sections can be marked
/// failing to simulate an unavailable upstream. Every returned snapshot is
/// restamped with the fetch time.
pub struct StaticSource {
    snapshots: RwLock<BTreeMap<SectionId, SectionSnapshot>>,
    failing: RwLock<BTreeSet<SectionId>>,
    latency: Option<Duration>,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StaticSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(BTreeMap::new()),
            failing: RwLock::new(BTreeSet::new()),
            latency: None,
            fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Create a source serving the given snapshots.
    pub fn with_snapshots(snapshots: impl IntoIterator<Item = SectionSnapshot>) -> Self {
        let source = Self::new();
        for snapshot in snapshots {
            source.set(snapshot);
        }
        source
    }

    /// Delay every fetch by `latency` (uses the tokio clock).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert or replace the live snapshot of a section.
    pub fn set(&self, snapshot: SectionSnapshot) {
        self.snapshots
            .write()
            .expect("lock poisoned")
            .insert(snapshot.id().clone(), snapshot);
    }

    /// Stop serving a section. Returns `true` if it was present.
    pub fn remove(&self, id: &SectionId) -> bool {
        self.snapshots
            .write()
            .expect("lock poisoned")
            .remove(id)
            .is_some()
    }

    /// Make fetches of a section fail until [`recover`](Self::recover) is called.
    pub fn fail(&self, id: &SectionId) {
        self.failing
            .write()
            .expect("lock poisoned")
            .insert(id.clone());
    }

    /// Undo [`fail`](Self::fail).
    pub fn recover(&self, id: &SectionId) {
        self.failing.write().expect("lock poisoned").remove(id);
    }

    /// Total number of fetches served (successful or not).
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lookup(&self, id: &SectionId) -> FetchResult<SectionSnapshot> {
        if self.failing.read().expect("lock poisoned").contains(id) {
            return Err(FetchError::Unavailable(id.clone()));
        }
        self.snapshots
            .read()
            .expect("lock poisoned")
            .get(id)
            .map(|s| s.restamped(Local::now()))
            .ok_or_else(|| FetchError::Unavailable(id.clone()))
    }
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotSource for StaticSource {
    async fn fetch(&self, id: &SectionId) -> FetchResult<SectionSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let result = self.lookup(id);
        trace!(section = %id, ok = result.is_ok(), "static fetch");
        result
    }
}

/// Counts one running fetch; released on drop, so cancelled fetches are
/// released too.
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for StaticSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSource")
            .field("sections", &self.snapshots.read().expect("lock poisoned").len())
            .field("fetches", &self.fetch_count())
            .finish()
    }
}
