use std::time::Duration;

use seatwatch_types::SectionId;

/// Why a single fetch produced no snapshot.
///
/// Fetch errors are per-section and recoverable: the tracker treats them as
/// "no new information this cycle" and retries on the next one.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The source has no data for the section right now.
    #[error("section {0} is unavailable")]
    Unavailable(SectionId),

    /// The fetch did not finish within the allowed time.
    #[error("fetching {section} timed out after {after:?}")]
    Timeout { section: SectionId, after: Duration },

    /// The source responded with data that could not be interpreted.
    #[error("malformed source data: {0}")]
    Malformed(String),

    /// I/O failure while reading from the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The fetch task ended without producing a result.
    #[error("fetch aborted: {0}")]
    Aborted(String),
}

/// Result alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
