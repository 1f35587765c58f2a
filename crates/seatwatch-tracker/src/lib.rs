//! Section tracker for seatwatch.
//!
//! Ties the other crates together: a [`Scheduler`] fires update cycles on a
//! fixed delay, each cycle fetches every tracked section through a bounded
//! worker pool ([`fetch_all`]), diffs the results against the
//! [`TrackingStore`](seatwatch_store::TrackingStore), and hands the changes
//! to the [`UpdateDispatcher`](seatwatch_sink::UpdateDispatcher).
//!
//! # Key Types
//!
//! - [`SectionTracker`] -- the tracker itself, built with [`TrackerBuilder`]
//! - [`CycleReport`] -- what one cycle fetched and changed
//! - [`TrackerConfig`] -- TOML-backed settings

pub mod config;
pub mod cycle;
pub mod error;
pub mod pool;
pub mod scheduler;
pub mod tracker;

pub use config::{TrackerConfig, DEFAULT_WORKERS};
pub use cycle::CycleReport;
pub use error::{TrackerError, TrackerResult};
pub use pool::{fetch_all, FetchOutcome};
pub use scheduler::{Scheduler, SchedulerState};
pub use tracker::{SectionTracker, TrackerBuilder};
