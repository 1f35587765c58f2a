use std::fmt;

use serde::{Deserialize, Serialize};

/// Seat availability counters for a section.
///
/// The total seat count is not stored: it is always recomputed as
/// `total_remaining + currently_registered`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatCounts {
    pub total_remaining: u32,
    pub currently_registered: u32,
    pub general_remaining: u32,
    pub restricted_remaining: u32,
}

impl SeatCounts {
    pub fn new(
        total_remaining: u32,
        currently_registered: u32,
        general_remaining: u32,
        restricted_remaining: u32,
    ) -> Self {
        Self {
            total_remaining,
            currently_registered,
            general_remaining,
            restricted_remaining,
        }
    }

    /// Seat capacity of the section.
    pub fn total_seats(&self) -> u32 {
        self.total_remaining.saturating_add(self.currently_registered)
    }

    /// Returns `true` if no seats of any kind remain.
    pub fn is_full(&self) -> bool {
        self.total_remaining == 0
    }
}

impl fmt::Display for SeatCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_seats();
        writeln!(f, "Total Seats Remaining: {} of {}", self.total_remaining, total)?;
        writeln!(f, "Currently Registered: {} of {}", self.currently_registered, total)?;
        writeln!(f, "General Seats Remaining: {} of {}", self.general_remaining, total)?;
        write!(f, "Restricted Seats Remaining: {} of {}", self.restricted_remaining, total)
    }
}
