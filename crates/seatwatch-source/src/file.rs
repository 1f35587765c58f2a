use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use tracing::debug;

use seatwatch_types::{SectionId, SectionSnapshot};

use crate::error::{FetchError, FetchResult};
use crate::source::SnapshotSource;

/// Parse a JSON array of snapshots.
pub fn parse_snapshots(json: &str) -> FetchResult<Vec<SectionSnapshot>> {
    serde_json::from_str(json).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Read and parse a JSON array of snapshots from disk.
pub async fn load_snapshots(path: &Path) -> FetchResult<Vec<SectionSnapshot>> {
    let json = tokio::fs::read_to_string(path).await?;
    parse_snapshots(&json)
}

/// Snapshot source backed by a JSON document on disk.
///
/// The file is re-read on every fetch, so whatever process maintains it is
/// the upstream. A section missing from the document is reported as
/// unavailable; if an identity appears more than once the first entry wins.
///
/// Each fetch reads and parses the whole document, so one cycle over N
/// sections costs N reads. Fine for hand-maintained files; a large feed
/// wants a source that parses once per cycle.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for JsonFileSource {
    async fn fetch(&self, id: &SectionId) -> FetchResult<SectionSnapshot> {
        let snapshots = load_snapshots(&self.path).await?;
        let found = snapshots
            .into_iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| FetchError::Unavailable(id.clone()))?;
        debug!(section = %id, path = %self.path.display(), "loaded snapshot from file");
        Ok(found.restamped(Local::now()))
    }
}
