//! Foundation types for seatwatch.
//!
//! This crate provides the data model shared by every other seatwatch crate:
//! what a tracked course section is, what a fetch of it looks like, and what
//! a detected difference between two fetches looks like.
//!
//! # Key Types
//!
//! - [`SectionId`] -- Normalized `{subject, course, section}` identity key
//! - [`SeatCounts`] -- Seat availability counters with a derived total
//! - [`SectionSnapshot`] -- One fetch's immutable view of a section
//! - [`Change`] / [`FieldKind`] -- A single field-level difference

pub mod change;
pub mod error;
pub mod identity;
pub mod seats;
pub mod snapshot;

pub use change::{format_timestamp, no_changes_line, Change, FieldKind, TIMESTAMP_FORMAT};
pub use error::TypeError;
pub use identity::SectionId;
pub use seats::SeatCounts;
pub use snapshot::{SectionSnapshot, SnapshotBuilder};
