use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::identity::SectionId;

/// Short local date-time form used in every emitted line, e.g. `9/1/26, 8:05 AM`.
pub const TIMESTAMP_FORMAT: &str = "%-m/%-d/%y, %-I:%M %p";

/// Render a timestamp in [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// The marker line reported for a cycle that detected nothing.
pub fn no_changes_line(at: &DateTime<Local>) -> String {
    format!("[{}] No changes.", format_timestamp(at))
}

/// A monitored section field.
///
/// Variant order is the fixed emission order of a diff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldKind {
    Instructor,
    TotalSeatsRemaining,
    CurrentlyRegistered,
    GeneralSeatsRemaining,
    RestrictedSeatsRemaining,
}

impl FieldKind {
    /// All monitored fields, in emission order.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Instructor,
        FieldKind::TotalSeatsRemaining,
        FieldKind::CurrentlyRegistered,
        FieldKind::GeneralSeatsRemaining,
        FieldKind::RestrictedSeatsRemaining,
    ];

    /// Human-readable label used in change lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Instructor => "Instructor",
            Self::TotalSeatsRemaining => "Total Seats Remaining",
            Self::CurrentlyRegistered => "Currently Registered",
            Self::GeneralSeatsRemaining => "General Seats Remaining",
            Self::RestrictedSeatsRemaining => "Restricted Seats Remaining",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One field-level difference between two snapshots of the same section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    timestamp: DateTime<Local>,
    section: SectionId,
    field: FieldKind,
    old_value: String,
    new_value: String,
}

impl Change {
    pub fn new(
        timestamp: DateTime<Local>,
        section: SectionId,
        field: FieldKind,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            section,
            field,
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn section(&self) -> &SectionId {
        &self.section
    }

    pub fn field(&self) -> FieldKind {
        self.field
    }

    pub fn old_value(&self) -> &str {
        &self.old_value
    }

    pub fn new_value(&self) -> &str {
        &self.new_value
    }
}

/// `[<local timestamp>] <subject> <course> <section> - <field>: <old> -> <new>`
impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {} - {}: {} -> {}",
            format_timestamp(&self.timestamp),
            self.section.subject(),
            self.section.course(),
            self.section.section(),
            self.field,
            self.old_value,
            self.new_value
        )
    }
}
