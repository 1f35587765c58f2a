use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, error, info, warn};

use seatwatch_diff::diff_sections;
use seatwatch_sink::{ExportSink, FileExport, UpdateDispatcher};
use seatwatch_source::{SnapshotSource, TimeoutSource};
use seatwatch_store::{CycleRecord, CycleUpdate, TrackingStore};
use seatwatch_types::{SectionId, SectionSnapshot};

use crate::config::{TrackerConfig, DEFAULT_WORKERS};
use crate::cycle::CycleReport;
use crate::error::{TrackerError, TrackerResult};
use crate::pool::fetch_all;
use crate::scheduler::{Scheduler, SchedulerState};

/// Periodically re-fetches a fixed set of sections, records what changed
/// and dispatches the changes.
///
/// The tracked identity set is fixed when the tracker is built. Each cycle
/// fetches every section through a bounded worker pool, diffs the results
/// against the stored snapshots, applies the changed ones to the store in
/// one step and only then dispatches them.
pub struct SectionTracker {
    inner: Arc<TrackerInner>,
    scheduler: Scheduler,
}

struct TrackerInner {
    source: Arc<dyn SnapshotSource>,
    store: TrackingStore,
    dispatcher: UpdateDispatcher,
    workers: usize,
    /// Held for a whole cycle body; scheduled and manual cycles take turns.
    cycle: tokio::sync::Mutex<()>,
}

impl SectionTracker {
    pub fn builder(source: Arc<dyn SnapshotSource>) -> TrackerBuilder {
        TrackerBuilder::new(source)
    }

    // -- control ------------------------------------------------------------

    /// Start periodic cycles. See [`Scheduler::start`].
    pub fn start(&self, interval: Duration, initial_delay: Duration) -> TrackerResult<()> {
        let inner = Arc::clone(&self.inner);
        self.scheduler.start(interval, initial_delay, move || {
            let inner = Arc::clone(&inner);
            async move {
                if let Err(e) = inner.run_cycle().await {
                    error!(error = %e, "update cycle failed");
                }
            }
        })
    }

    pub fn pause(&self) -> TrackerResult<()> {
        self.scheduler.pause()
    }

    pub fn resume(&self) -> TrackerResult<()> {
        self.scheduler.resume()
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Run one cycle now, independent of the scheduler.
    ///
    /// Waits for a scheduled cycle in flight to finish first.
    ///
    /// Fetch failures are counted in the report, never returned. A dispatch
    /// failure is returned, but the store has already been updated.
    pub async fn run_cycle(&self) -> TrackerResult<CycleReport> {
        self.inner.run_cycle().await
    }

    pub fn enable_live_print(&self, enabled: bool) {
        self.inner.dispatcher.enable_live_print(enabled);
    }

    /// Toggle export. A missing destination is reported by the next cycle.
    pub fn enable_export(&self, enabled: bool) {
        self.inner.dispatcher.enable_export(enabled);
    }

    pub fn set_export_destination(&self, sink: Arc<dyn ExportSink>) {
        self.inner.dispatcher.set_export_destination(sink);
    }

    /// Export to a file, created if missing and appended to otherwise.
    pub fn set_export_path(&self, path: &Path) -> TrackerResult<()> {
        let export = FileExport::open(path)?;
        self.set_export_destination(Arc::new(export));
        Ok(())
    }

    pub fn clear_history(&self) {
        self.inner.store.clear_history();
    }

    // -- queries ------------------------------------------------------------

    pub fn current_snapshot(&self, id: &SectionId) -> Option<SectionSnapshot> {
        self.inner.store.snapshot_of(id)
    }

    /// Change history, oldest cycle first.
    pub fn history(&self) -> Vec<CycleRecord> {
        self.inner.store.history()
    }

    /// Tracked identities, in identity order.
    pub fn tracked(&self) -> Vec<SectionId> {
        self.inner.store.identities()
    }

    pub fn snapshots(&self) -> Vec<SectionSnapshot> {
        self.inner.store.snapshots()
    }
}

impl TrackerInner {
    async fn run_cycle(&self) -> TrackerResult<CycleReport> {
        let _cycle = self.cycle.lock().await;
        let timestamp = Local::now();
        let ids = self.store.identities();
        let outcomes = fetch_all(Arc::clone(&self.source), ids, self.workers).await;

        let mut fetched = 0;
        let mut failed = 0;
        let mut updates = BTreeMap::new();
        for (id, outcome) in outcomes {
            let fresh = match outcome {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    debug!(section = %id, error = %e, "no new data this cycle");
                    failed += 1;
                    continue;
                }
            };
            let Some(stored) = self.store.snapshot_of(&id) else {
                continue;
            };
            match diff_sections(&stored, &fresh, timestamp) {
                Ok(diff) => {
                    fetched += 1;
                    updates.insert(id, CycleUpdate::new(fresh, diff.into_changes()));
                }
                Err(e) => {
                    warn!(section = %id, error = %e, "source returned the wrong section");
                    failed += 1;
                }
            }
        }

        let changes = self
            .store
            .apply_cycle_result(timestamp, updates)?
            .map(|record| record.changes)
            .unwrap_or_default();
        let report = CycleReport {
            timestamp,
            fetched,
            failed,
            changes,
        };

        if report.is_quiet() {
            debug!(fetched, failed, "cycle completed without changes");
        } else {
            info!(
                changed = report.changes.len(),
                changes = report.change_count(),
                failed,
                "cycle completed"
            );
        }

        self.dispatcher.dispatch(&report.timestamp, &report.changes)?;
        Ok(report)
    }
}

impl std::fmt::Debug for SectionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionTracker")
            .field("store", &self.inner.store)
            .field("dispatcher", &self.inner.dispatcher)
            .field("workers", &self.inner.workers)
            .field("state", &self.scheduler.state())
            .finish()
    }
}

/// Builder for [`SectionTracker`].
///
/// A tracker is seeded either with ready snapshots ([`seed`](Self::seed) +
/// [`build`](Self::build)) or by fetching a baseline for each identity
/// ([`resolve`](Self::resolve)).
pub struct TrackerBuilder {
    source: Arc<dyn SnapshotSource>,
    seed: Vec<SectionSnapshot>,
    workers: usize,
    fetch_timeout: Option<Duration>,
    live_output: Option<Box<dyn Write + Send>>,
    live_print: bool,
    export: bool,
    export_path: Option<std::path::PathBuf>,
}

impl TrackerBuilder {
    fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            seed: Vec::new(),
            workers: DEFAULT_WORKERS,
            fetch_timeout: None,
            live_output: None,
            live_print: false,
            export: false,
            export_path: None,
        }
    }

    /// Add initial snapshots. Duplicate identities collapse to the first.
    pub fn seed(mut self, snapshots: impl IntoIterator<Item = SectionSnapshot>) -> Self {
        self.seed.extend(snapshots);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Fail any fetch that takes longer than `limit`.
    pub fn fetch_timeout(mut self, limit: Duration) -> Self {
        self.fetch_timeout = Some(limit);
        self
    }

    /// Write live output here instead of stdout.
    pub fn live_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.live_output = Some(out);
        self
    }

    /// Take pool size, timeout and sink settings from a config.
    pub fn config(mut self, config: &TrackerConfig) -> Self {
        self.workers = config.workers;
        self.fetch_timeout = config.fetch_timeout();
        self.live_print = config.live_print;
        self.export = config.export;
        self.export_path = config.export_path.clone();
        self
    }

    /// Fetch a baseline snapshot for every identity, then build.
    ///
    /// Identities whose baseline cannot be fetched are skipped.
    pub async fn resolve(mut self, ids: impl IntoIterator<Item = SectionId>) -> TrackerResult<SectionTracker> {
        self.check_workers()?;
        let ids: Vec<SectionId> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let requested = ids.len();
        let source = self.effective_source();

        for (id, outcome) in fetch_all(source, ids, self.workers).await {
            match outcome {
                Ok(snapshot) if snapshot.id() == &id => self.seed.push(snapshot),
                Ok(snapshot) => {
                    warn!(section = %id, returned = %snapshot.id(), "seed resolved to a different section, skipped");
                }
                Err(e) => warn!(section = %id, error = %e, "seed section could not be resolved, skipped"),
            }
        }
        info!(requested, resolved = self.seed.len(), "seed sections resolved");
        self.build()
    }

    pub fn build(self) -> TrackerResult<SectionTracker> {
        self.check_workers()?;
        let source = self.effective_source();

        let dispatcher = match self.live_output {
            Some(out) => UpdateDispatcher::with_live_output(out),
            None => UpdateDispatcher::new(),
        };
        if let Some(path) = &self.export_path {
            dispatcher.set_export_destination(Arc::new(FileExport::open(path)?));
        }
        dispatcher.enable_live_print(self.live_print);
        dispatcher.enable_export(self.export);

        let store = TrackingStore::seed(self.seed);
        debug!(tracked = store.len(), workers = self.workers, "tracker built");

        Ok(SectionTracker {
            inner: Arc::new(TrackerInner {
                source,
                store,
                dispatcher,
                workers: self.workers,
                cycle: tokio::sync::Mutex::new(()),
            }),
            scheduler: Scheduler::new(),
        })
    }

    fn check_workers(&self) -> TrackerResult<()> {
        if self.workers == 0 {
            return Err(TrackerError::config("workers must be greater than zero"));
        }
        Ok(())
    }

    fn effective_source(&self) -> Arc<dyn SnapshotSource> {
        match self.fetch_timeout {
            Some(limit) => Arc::new(TimeoutSource::new(Arc::clone(&self.source), limit)),
            None => Arc::clone(&self.source),
        }
    }
}
