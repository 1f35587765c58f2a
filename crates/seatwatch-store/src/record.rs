use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use seatwatch_types::{Change, SectionId, SectionSnapshot};

/// The outcome of one cycle for a single section: the freshly fetched
/// snapshot and the changes it carries relative to the stored one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleUpdate {
    pub snapshot: SectionSnapshot,
    pub changes: Vec<Change>,
}

impl CycleUpdate {
    pub fn new(snapshot: SectionSnapshot, changes: Vec<Change>) -> Self {
        Self { snapshot, changes }
    }

    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Changes detected in one cycle, keyed by section.
pub type CycleChanges = BTreeMap<SectionId, Vec<Change>>;

/// One history entry: every section that changed in a cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub timestamp: DateTime<Local>,
    pub changes: CycleChanges,
}

impl CycleRecord {
    /// Sections that changed in this cycle, in identity order.
    pub fn sections(&self) -> impl Iterator<Item = &SectionId> {
        self.changes.keys()
    }

    /// Total number of field changes across all sections.
    pub fn change_count(&self) -> usize {
        self.changes.values().map(Vec::len).sum()
    }

    /// All changes flattened in emission order.
    pub fn iter_changes(&self) -> impl Iterator<Item = &Change> {
        self.changes.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatwatch_types::FieldKind;

    #[test]
    fn record_counts_and_order() {
        let at = Local::now();
        let a: SectionId = "CPSC 213 101".parse().unwrap();
        let b: SectionId = "CPSC 110 101".parse().unwrap();

        let mut changes = CycleChanges::new();
        changes.insert(
            a.clone(),
            vec![
                Change::new(at, a.clone(), FieldKind::Instructor, "Smith", "Jones"),
                Change::new(at, a.clone(), FieldKind::TotalSeatsRemaining, "5", "4"),
            ],
        );
        changes.insert(
            b.clone(),
            vec![Change::new(at, b.clone(), FieldKind::CurrentlyRegistered, "10", "11")],
        );

        let record = CycleRecord { timestamp: at, changes };
        assert_eq!(record.change_count(), 3);
        assert_eq!(record.sections().cloned().collect::<Vec<_>>(), vec![b, a]);
        let fields: Vec<_> = record.iter_changes().map(Change::field).collect();
        assert_eq!(
            fields,
            vec![
                FieldKind::CurrentlyRegistered,
                FieldKind::Instructor,
                FieldKind::TotalSeatsRemaining,
            ]
        );
    }
}
