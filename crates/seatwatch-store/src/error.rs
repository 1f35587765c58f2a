use seatwatch_types::SectionId;

/// Errors from tracking store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A cycle result referenced a section that is not tracked.
    #[error("section {0} is not tracked")]
    UnknownSection(SectionId),

    /// A cycle result's snapshot does not belong to the key it was filed under.
    #[error("snapshot for {actual} filed under {key}")]
    MisfiledSnapshot { key: SectionId, actual: SectionId },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
