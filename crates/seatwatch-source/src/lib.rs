//! Snapshot sources for seatwatch.
//!
//! A [`SnapshotSource`] turns a section identity into a fresh
//! [`SectionSnapshot`](seatwatch_types::SectionSnapshot), or reports why it
//! could not. How the data is obtained is up to the implementation; the
//! tracker only relies on the fetch contract.
//!
//! # Implementations
//!
//! - [`StaticSource`] -- mutable in-memory table, for embedding and tests
//! - [`JsonFileSource`] -- re-reads a JSON document of snapshots on every fetch
//! - [`TimeoutSource`] -- bounds the latency of any other source

pub mod error;
pub mod file;
pub mod memory;
pub mod source;
pub mod timeout;

pub use error::{FetchError, FetchResult};
pub use file::{load_snapshots, parse_snapshots, JsonFileSource};
pub use memory::StaticSource;
pub use source::SnapshotSource;
pub use timeout::TimeoutSource;
