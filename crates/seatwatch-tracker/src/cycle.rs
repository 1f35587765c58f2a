use chrono::{DateTime, Local};

use seatwatch_store::CycleChanges;
use seatwatch_types::SectionId;

/// Outcome of one update cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleReport {
    /// Cycle time; every change in the cycle carries it.
    pub timestamp: DateTime<Local>,
    /// Sections fetched successfully.
    pub fetched: usize,
    /// Sections whose fetch failed and were left untouched.
    pub failed: usize,
    /// Changes applied to the store, by section.
    pub changes: CycleChanges,
}

impl CycleReport {
    pub fn changed_sections(&self) -> impl Iterator<Item = &SectionId> {
        self.changes.keys()
    }

    pub fn change_count(&self) -> usize {
        self.changes.values().map(Vec::len).sum()
    }

    /// Returns `true` if no section changed.
    pub fn is_quiet(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatwatch_types::{Change, FieldKind};

    #[test]
    fn quiet_report() {
        let report = CycleReport {
            timestamp: Local::now(),
            fetched: 3,
            failed: 1,
            changes: CycleChanges::new(),
        };
        assert!(report.is_quiet());
        assert_eq!(report.change_count(), 0);
        assert_eq!(report.changed_sections().count(), 0);
    }

    #[test]
    fn counts_changes_across_sections() {
        let at = Local::now();
        let a: SectionId = "CPSC 213 101".parse().unwrap();
        let b: SectionId = "BIOL 112 101".parse().unwrap();
        let mut changes = CycleChanges::new();
        changes.insert(
            a.clone(),
            vec![
                Change::new(at, a.clone(), FieldKind::Instructor, "Smith", "Jones"),
                Change::new(at, a.clone(), FieldKind::GeneralSeatsRemaining, "3", "2"),
            ],
        );
        changes.insert(
            b.clone(),
            vec![Change::new(at, b.clone(), FieldKind::RestrictedSeatsRemaining, "1", "0")],
        );

        let report = CycleReport { timestamp: at, fetched: 2, failed: 0, changes };
        assert!(!report.is_quiet());
        assert_eq!(report.change_count(), 3);
        assert_eq!(report.changed_sections().cloned().collect::<Vec<_>>(), vec![b, a]);
    }
}
