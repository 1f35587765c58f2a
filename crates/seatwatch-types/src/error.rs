use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("section identity component `{component}` is empty")]
    EmptyComponent { component: &'static str },

    #[error("invalid section identity `{0}`: expected `<subject> <course> <section>`")]
    InvalidIdentity(String),

    #[error("snapshot is missing required field `{0}`")]
    MissingField(&'static str),
}
