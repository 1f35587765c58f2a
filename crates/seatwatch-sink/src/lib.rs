//! Update sinks for seatwatch.
//!
//! After every tracking cycle the [`UpdateDispatcher`] renders the cycle's
//! changes as text lines and routes them to two independent outputs: a live
//! writer (stdout by default) and an append-only [`ExportSink`].

pub mod dispatcher;
pub mod error;
pub mod export;

pub use dispatcher::{cycle_lines, DispatchSummary, UpdateDispatcher};
pub use error::{SinkError, SinkResult};
pub use export::{ExportSink, FileExport, MemoryExport};
