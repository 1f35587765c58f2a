use std::io;

/// Errors produced while dispatching cycle output.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Export is enabled but no destination has been configured.
    #[error("export is enabled but no export destination is set")]
    MissingDestination,

    /// Writing to the export destination failed.
    #[error("failed to write to export destination {destination}: {source}")]
    Write {
        destination: String,
        #[source]
        source: io::Error,
    },

    /// Writing to the live output failed.
    #[error("failed to write live output: {0}")]
    Live(#[source] io::Error),
}

impl SinkError {
    /// Returns `true` for errors caused by configuration rather than I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingDestination)
    }
}

/// Result alias for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;
