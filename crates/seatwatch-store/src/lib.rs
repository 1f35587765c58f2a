//! Tracking store for seatwatch.
//!
//! Holds the current authoritative snapshot of every tracked section and the
//! append-only history of detected changes.
//!
//! # Design Rules
//!
//! 1. The tracked identity set is fixed at construction. Cycles replace
//!    snapshots but never add or remove identities.
//! 2. A cycle's result is applied in one step under a single write lock, so
//!    readers never observe a half-applied cycle.
//! 3. One history record aggregates every changed section of a cycle.
//!    Quiet cycles leave no record.
//! 4. History is only ever truncated by an explicit clear.

pub mod error;
pub mod record;
pub mod tracking;

pub use error::{StoreError, StoreResult};
pub use record::{CycleChanges, CycleRecord, CycleUpdate};
pub use tracking::TrackingStore;
