use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::SectionId;
use crate::seats::SeatCounts;

/// One fetch's complete view of a section's monitored fields.
///
/// Snapshots are immutable once built. Diffing compares two of them and
/// never mutates either; tracking replaces a stored snapshot wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    id: SectionId,
    activity: String,
    term: u32,
    instructor: String,
    seats: SeatCounts,
    /// Absent from hand-written documents; stamped at load time.
    #[serde(default = "Local::now")]
    retrieved_at: DateTime<Local>,
}

impl SectionSnapshot {
    /// Construct a snapshot from all of its fields.
    pub fn new(
        id: SectionId,
        activity: impl Into<String>,
        term: u32,
        instructor: impl Into<String>,
        seats: SeatCounts,
        retrieved_at: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            activity: activity.into(),
            term,
            instructor: instructor.into(),
            seats,
            retrieved_at,
        }
    }

    /// Start a validated builder for the given identity.
    pub fn builder(id: SectionId) -> SnapshotBuilder {
        SnapshotBuilder::new(id)
    }

    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Activity type, e.g. `Lecture` or `Laboratory`.
    pub fn activity(&self) -> &str {
        &self.activity
    }

    pub fn term(&self) -> u32 {
        self.term
    }

    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    pub fn seats(&self) -> &SeatCounts {
        &self.seats
    }

    pub fn retrieved_at(&self) -> DateTime<Local> {
        self.retrieved_at
    }

    /// A copy of this snapshot carrying a different retrieval time.
    pub fn restamped(&self, retrieved_at: DateTime<Local>) -> Self {
        Self {
            retrieved_at,
            ..self.clone()
        }
    }
}

/// Validated builder producing an immutable [`SectionSnapshot`].
///
/// `activity`, `term` and `instructor` are required. Seats default to zero
/// and the retrieval time defaults to the moment `build` is called.
#[derive(Clone, Debug)]
pub struct SnapshotBuilder {
    id: SectionId,
    activity: Option<String>,
    term: Option<u32>,
    instructor: Option<String>,
    seats: SeatCounts,
    retrieved_at: Option<DateTime<Local>>,
}

impl SnapshotBuilder {
    pub fn new(id: SectionId) -> Self {
        Self {
            id,
            activity: None,
            term: None,
            instructor: None,
            seats: SeatCounts::default(),
            retrieved_at: None,
        }
    }

    pub fn activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn term(mut self, term: u32) -> Self {
        self.term = Some(term);
        self
    }

    pub fn instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn seats(mut self, seats: SeatCounts) -> Self {
        self.seats = seats;
        self
    }

    pub fn retrieved_at(mut self, at: DateTime<Local>) -> Self {
        self.retrieved_at = Some(at);
        self
    }

    pub fn build(self) -> Result<SectionSnapshot, TypeError> {
        let activity = self
            .activity
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .ok_or(TypeError::MissingField("activity"))?;
        let term = self.term.ok_or(TypeError::MissingField("term"))?;
        let instructor = self
            .instructor
            .ok_or(TypeError::MissingField("instructor"))?;

        Ok(SectionSnapshot {
            id: self.id,
            activity,
            term,
            instructor: instructor.trim().to_string(),
            seats: self.seats,
            retrieved_at: self.retrieved_at.unwrap_or_else(Local::now),
        })
    }
}
