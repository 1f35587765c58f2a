//! Diff engine for seatwatch.
//!
//! Compares two snapshots of the same section field by field and produces
//! the ordered list of [`Change`](seatwatch_types::Change)s between them.
//!
//! # Key Types
//!
//! - [`SectionDiff`] -- the changes detected for one section
//! - [`diff_sections`] -- the comparison itself

pub mod error;
pub mod section_diff;

pub use error::{DiffError, DiffResult};
pub use section_diff::{diff_sections, SectionDiff};
