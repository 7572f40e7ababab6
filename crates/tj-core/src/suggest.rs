//! Default times for the next entry of a day.

use serde::Serialize;

use crate::clock::{Slot, TimeRange};
use crate::entry::TimeLog;
use crate::types::LogId;

/// A proposed range for the next entry. Advisory: validation is the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    #[serde(flatten)]
    pub range: TimeRange,
    /// The latest entry already ends at `24:00`; the range is empty.
    pub day_full: bool,
    /// The entry the suggestion continues from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<LogId>,
}

/// Proposes one slot starting where the day's latest entry ends.
///
/// An empty day starts at `00:00`. When several entries share the latest end
/// the one with the latest start wins, then the greatest id.
pub fn suggest_next_slot(day: &[TimeLog]) -> Suggestion {
    let last = day.iter().max_by(|a, b| {
        (a.range.end, a.range.start)
            .cmp(&(b.range.end, b.range.start))
            .then_with(|| a.id.cmp(&b.id))
    });

    let start = last.map_or(Slot::START_OF_DAY, |log| log.range.end);
    let suggestion = Suggestion {
        range: TimeRange::new(start, start.next()),
        day_full: start == Slot::END_OF_DAY,
        after: last.map(|log| log.id.clone()),
    };
    tracing::debug!(
        entries = day.len(),
        range = %suggestion.range,
        day_full = suggestion.day_full,
        "suggested next slot"
    );
    suggestion
}
