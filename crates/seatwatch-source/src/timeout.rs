use std::time::Duration;

use async_trait::async_trait;

use seatwatch_types::{SectionId, SectionSnapshot};

use crate::error::{FetchError, FetchResult};
use crate::source::SnapshotSource;

/// Wraps a source and fails any fetch that exceeds `limit`.
///
/// The tracker itself enforces no per-fetch deadline; a hung fetch stalls
/// its cycle. Wrapping the source bounds cycle latency.
#[derive(Debug)]
pub struct TimeoutSource<S> {
    inner: S,
    limit: Duration,
}

impl<S> TimeoutSource<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S: SnapshotSource> SnapshotSource for TimeoutSource<S> {
    async fn fetch(&self, id: &SectionId) -> FetchResult<SectionSnapshot> {
        tokio::time::timeout(self.limit, self.inner.fetch(id))
            .await
            .map_err(|_| FetchError::Timeout {
                section: id.clone(),
                after: self.limit,
            })?
    }
}
