//! Error types for the diff crate.

use seatwatch_types::SectionId;

/// Errors that can occur during diff operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The two snapshots describe different sections.
    #[error("cannot diff {old} against {new}: identities differ")]
    IdentityMismatch { old: SectionId, new: SectionId },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
