use seatwatch_sink::SinkError;
use seatwatch_store::StoreError;

/// Errors produced by the tracker and its scheduler.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Invalid settings or an operation not allowed in the current state.
    /// Raised before anything takes effect.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Applying a cycle result to the store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Emitting a cycle's changes failed. Store updates already applied
    /// for that cycle are kept.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] SinkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns `true` for configuration errors, including an export
    /// enabled without a destination.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Configuration(_) => true,
            Self::Dispatch(e) => e.is_configuration(),
            _ => false,
        }
    }
}

/// Result alias for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
