use std::sync::Arc;

use async_trait::async_trait;
use seatwatch_types::{SectionId, SectionSnapshot};

use crate::error::FetchResult;

/// Fetch contract for section snapshots.
///
/// Implementations must be safe to call concurrently for different
/// sections. They should not retry internally; the next tracking cycle is
/// the retry.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch a fresh snapshot of the given section.
    async fn fetch(&self, id: &SectionId) -> FetchResult<SectionSnapshot>;
}

#[async_trait]
impl<S: SnapshotSource + ?Sized> SnapshotSource for Arc<S> {
    async fn fetch(&self, id: &SectionId) -> FetchResult<SectionSnapshot> {
        (**self).fetch(id).await
    }
}
