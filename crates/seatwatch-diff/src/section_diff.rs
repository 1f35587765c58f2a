//! Section-level diff: compare two snapshots of one section.
//!
//! Only the monitored fields are compared. Identity, activity and term are
//! assumed stable and never produce changes.

use chrono::{DateTime, Local};

use seatwatch_types::{Change, FieldKind, SectionId, SectionSnapshot};

use crate::error::{DiffError, DiffResult};

/// The result of comparing two snapshots of the same section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionDiff {
    /// The section both snapshots describe.
    pub section: SectionId,
    /// Detected changes, in [`FieldKind::ALL`] order.
    pub changes: Vec<Change>,
}

impl SectionDiff {
    /// Returns `true` if no monitored field changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// The fields that changed, in emission order.
    pub fn fields(&self) -> Vec<FieldKind> {
        self.changes.iter().map(Change::field).collect()
    }

    /// Returns `true` if the given field changed.
    pub fn touches(&self, field: FieldKind) -> bool {
        self.changes.iter().any(|c| c.field() == field)
    }

    pub fn into_changes(self) -> Vec<Change> {
        self.changes
    }
}

/// Compute the field-level diff between two snapshots of one section.
///
/// Every change is stamped with `at`. Instructor compares as a string,
/// seat counters compare as integers; each differing field yields exactly
/// one change and unchanged fields yield nothing.
pub fn diff_sections(
    old: &SectionSnapshot,
    new: &SectionSnapshot,
    at: DateTime<Local>,
) -> DiffResult<SectionDiff> {
    if old.id() != new.id() {
        return Err(DiffError::IdentityMismatch {
            old: old.id().clone(),
            new: new.id().clone(),
        });
    }

    let section = old.id().clone();
    let changes = FieldKind::ALL
        .iter()
        .filter_map(|&field| {
            let (before, after) = field_values(old, new, field);
            (before != after).then(|| Change::new(at, section.clone(), field, before, after))
        })
        .collect();

    Ok(SectionDiff { section, changes })
}

fn field_values(old: &SectionSnapshot, new: &SectionSnapshot, field: FieldKind) -> (String, String) {
    let (a, b) = (old.seats(), new.seats());
    match field {
        FieldKind::Instructor => (old.instructor().to_string(), new.instructor().to_string()),
        FieldKind::TotalSeatsRemaining => (a.total_remaining.to_string(), b.total_remaining.to_string()),
        FieldKind::CurrentlyRegistered => (
            a.currently_registered.to_string(),
            b.currently_registered.to_string(),
        ),
        FieldKind::GeneralSeatsRemaining => (
            a.general_remaining.to_string(),
            b.general_remaining.to_string(),
        ),
        FieldKind::RestrictedSeatsRemaining => (
            a.restricted_remaining.to_string(),
            b.restricted_remaining.to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use seatwatch_types::SeatCounts;

    fn id() -> SectionId {
        "CPSC 213 101".parse().unwrap()
    }

    fn snap(instructor: &str, seats: SeatCounts) -> SectionSnapshot {
        SectionSnapshot::new(id(), "Lecture", 1, instructor, seats, Local::now())
    }

    #[test]
    fn identical_snapshots_no_diff() {
        let s = snap("Smith", SeatCounts::new(5, 145, 5, 0));
        let diff = diff_sections(&s, &s.clone(), Local::now()).unwrap();
        assert!(diff.is_empty());
        assert_eq!(diff.section, id());
    }

    #[test]
    fn instructor_swap() {
        let old = snap("Smith", SeatCounts::new(5, 145, 5, 0));
        let new = snap("Jones", SeatCounts::new(5, 145, 5, 0));
        let at = Local::now();

        let diff = diff_sections(&old, &new, at).unwrap();
        assert_eq!(diff.len(), 1);
        let change = &diff.changes[0];
        assert_eq!(change.field(), FieldKind::Instructor);
        assert_eq!(change.old_value(), "Smith");
        assert_eq!(change.new_value(), "Jones");
        assert_eq!(change.section(), &id());
        assert_eq!(change.timestamp(), at);
    }

    #[test]
    fn registration_moves_two_counters() {
        let old = snap("Smith", SeatCounts::new(5, 145, 5, 0));
        let new = snap("Smith", SeatCounts::new(4, 146, 4, 0));

        let diff = diff_sections(&old, &new, Local::now()).unwrap();
        assert_eq!(
            diff.fields(),
            vec![
                FieldKind::TotalSeatsRemaining,
                FieldKind::CurrentlyRegistered,
                FieldKind::GeneralSeatsRemaining,
            ]
        );
        assert_eq!(diff.changes[1].old_value(), "145");
        assert_eq!(diff.changes[1].new_value(), "146");
        assert!(!diff.touches(FieldKind::RestrictedSeatsRemaining));
    }

    #[test]
    fn every_field_changes_in_fixed_order() {
        let old = snap("Smith", SeatCounts::new(1, 2, 3, 4));
        let new = snap("Jones", SeatCounts::new(5, 6, 7, 8));
        let diff = diff_sections(&old, &new, Local::now()).unwrap();
        assert_eq!(diff.fields(), FieldKind::ALL.to_vec());
    }

    #[test]
    fn unmonitored_fields_ignored() {
        let old = snap("Smith", SeatCounts::new(5, 145, 5, 0));
        let new = SectionSnapshot::new(
            id(),
            "Laboratory",
            2,
            "Smith",
            SeatCounts::new(5, 145, 5, 0),
            Local::now() + chrono::Duration::hours(1),
        );
        assert!(diff_sections(&old, &new, Local::now()).unwrap().is_empty());
    }

    #[test]
    fn identity_mismatch_rejected() {
        let old = snap("Smith", SeatCounts::default());
        let other = SectionSnapshot::new(
            "CPSC 213 102".parse().unwrap(),
            "Lecture",
            1,
            "Smith",
            SeatCounts::default(),
            Local::now(),
        );
        let err = diff_sections(&old, &other, Local::now()).unwrap_err();
        assert!(matches!(err, DiffError::IdentityMismatch { .. }));
    }

    fn seats_strategy() -> impl Strategy<Value = SeatCounts> {
        (0u32..300, 0u32..300, 0u32..300, 0u32..300)
            .prop_map(|(t, c, g, r)| SeatCounts::new(t, c, g, r))
    }

    fn instructor_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z ]{0,12}"
    }

    proptest! {
        #[test]
        fn same_monitored_fields_never_differ(
            instructor in instructor_strategy(),
            seats in seats_strategy(),
            term in 1u32..3,
        ) {
            let old = SectionSnapshot::new(id(), "Lecture", term, instructor.clone(), seats, Local::now());
            let new = SectionSnapshot::new(id(), "Lecture", term, instructor, seats, Local::now());
            prop_assert!(diff_sections(&old, &new, Local::now()).unwrap().is_empty());
        }

        #[test]
        fn instructor_only_yields_single_change(
            a in instructor_strategy(),
            b in instructor_strategy(),
            seats in seats_strategy(),
        ) {
            prop_assume!(a != b);
            let old = snap(&a, seats);
            let new = snap(&b, seats);
            let diff = diff_sections(&old, &new, Local::now()).unwrap();
            prop_assert_eq!(diff.fields(), vec![FieldKind::Instructor]);
        }

        #[test]
        fn output_follows_field_order(
            a in instructor_strategy(),
            b in instructor_strategy(),
            old_seats in seats_strategy(),
            new_seats in seats_strategy(),
        ) {
            let diff = diff_sections(&snap(&a, old_seats), &snap(&b, new_seats), Local::now()).unwrap();
            let fields = diff.fields();
            let mut sorted = fields.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(fields, sorted);
        }
    }
}
