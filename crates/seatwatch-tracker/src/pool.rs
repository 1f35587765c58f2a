//! Bounded fetch worker pool.
//!
//! One call to [`fetch_all`] fans a fetch out per section onto tokio tasks,
//! at most `workers` in flight at once, and returns only after every task
//! has settled. Tasks live in a `JoinSet` owned by the call, so none can
//! outlive it: dropping the returned future aborts whatever is still
//! running.

use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use seatwatch_source::{FetchError, FetchResult, SnapshotSource};
use seatwatch_types::{SectionId, SectionSnapshot};

/// The settled result of fetching one section.
pub type FetchOutcome = (SectionId, FetchResult<SectionSnapshot>);

/// Fetch every section concurrently through a pool of `workers` permits.
///
/// Failures are isolated per section: an error or a panic inside one fetch
/// becomes that section's `Err` and never affects the others. Outcomes are
/// returned in identity order.
pub async fn fetch_all(
    source: Arc<dyn SnapshotSource>,
    ids: Vec<SectionId>,
    workers: usize,
) -> Vec<FetchOutcome> {
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let mut pending: BTreeSet<SectionId> = ids.iter().cloned().collect();
    let mut tasks = JoinSet::new();

    for id in ids {
        let source = Arc::clone(&source);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let outcome = match permits.acquire_owned().await {
                Ok(_permit) => AssertUnwindSafe(source.fetch(&id))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| Err(FetchError::Aborted("fetch panicked".into()))),
                Err(closed) => Err(FetchError::Aborted(closed.to_string())),
            };
            (id, outcome)
        });
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, outcome)) => {
                if let Err(ref e) = outcome {
                    debug!(section = %id, error = %e, "fetch failed");
                }
                pending.remove(&id);
                outcomes.push((id, outcome));
            }
            Err(e) => warn!(error = %e, "fetch task did not complete"),
        }
    }

    // Tasks that were cancelled out from under us still need an outcome.
    for id in pending {
        outcomes.push((id, Err(FetchError::Aborted("fetch task cancelled".into()))));
    }

    outcomes.sort_by(|a, b| a.0.cmp(&b.0));
    outcomes
}
