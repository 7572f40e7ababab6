//! Interval arithmetic over one day's slot ranges.
//!
//! Every function takes the day's existing ranges in any order. Ranges are
//! half-open, so `09:00-10:00` and `10:00-11:00` touch without overlapping.

use serde::Serialize;

use crate::clock::{Slot, TimeRange};

/// True iff `candidate` shares at least one slot with any existing range.
pub fn overlaps(existing: &[TimeRange], candidate: TimeRange) -> bool {
    existing.iter().any(|r| candidate.overlaps(r))
}

/// The earliest existing range that intersects `candidate`, if any.
pub fn first_conflict(existing: &[TimeRange], candidate: TimeRange) -> Option<TimeRange> {
    existing
        .iter()
        .filter(|r| candidate.overlaps(r))
        .min_by_key(|r| (r.start, r.end))
        .copied()
}

/// The free spans of the day: the complement of the union of `existing`
/// within `00:00-24:00`, in ascending order.
///
/// Overlapping inputs are tolerated: the walk keeps the furthest end claimed
/// so far, so no gap is ever emitted twice or with negative length.
pub fn gaps(existing: &[TimeRange]) -> Vec<TimeRange> {
    let mut sorted: Vec<TimeRange> = existing.iter().filter(|r| !r.is_empty()).copied().collect();
    sorted.sort_by_key(|r| (r.start, r.end));

    let mut result = Vec::new();
    let mut cursor = Slot::START_OF_DAY;
    for r in sorted {
        if cursor < r.start {
            result.push(TimeRange::new(cursor, r.start));
        }
        cursor = cursor.max(r.end);
    }
    if cursor < Slot::END_OF_DAY {
        result.push(TimeRange::new(cursor, Slot::END_OF_DAY));
    }
    result
}

/// Whether the half hour starting at `slot` is already taken.
pub fn is_occupied(existing: &[TimeRange], slot: Slot) -> bool {
    existing.iter().any(|r| r.contains(slot))
}

/// One selectable boundary and whether the half hour after it is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotChoice {
    pub slot: Slot,
    pub occupied: bool,
}

/// All 49 boundaries of the day, each marked occupied or free.
pub fn slot_choices(existing: &[TimeRange]) -> Vec<SlotChoice> {
    Slot::all()
        .map(|slot| SlotChoice {
            slot,
            occupied: is_occupied(existing, slot),
        })
        .collect()
}
