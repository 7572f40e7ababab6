//! Double-booking checks for new entries.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::clock::TimeRange;
use crate::entry::{Booked, NewTimeLog, TimeLog};
use crate::range;
use crate::store::LogStore;

/// Why a candidate entry was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionKind {
    /// Start is not strictly before end.
    InvalidOrder,
    /// The range intersects an existing entry of the same day.
    Overlap,
}

impl RejectionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidOrder => "invalid-order",
            Self::Overlap => "overlap",
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A refused candidate, with the existing entry it collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub candidate: TimeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<TimeRange>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.conflict) {
            (RejectionKind::Overlap, Some(conflict)) => write!(
                f,
                "{}: {} overlaps existing entry {conflict}",
                self.kind, self.candidate
            ),
            (RejectionKind::Overlap, None) => {
                write!(f, "{}: {} overlaps an existing entry", self.kind, self.candidate)
            }
            (RejectionKind::InvalidOrder, _) => write!(
                f,
                "{}: start {} must be earlier than end {}",
                self.kind, self.candidate.start, self.candidate.end
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// Checks a candidate against the entries already booked on its day.
///
/// Order is checked before overlap; the first failure wins. Pure: the same
/// inputs always produce the same verdict.
pub fn validate<E: Booked>(existing: &[E], candidate: TimeRange) -> Result<(), Rejection> {
    if candidate.start >= candidate.end {
        return Err(Rejection {
            kind: RejectionKind::InvalidOrder,
            candidate,
            conflict: None,
        });
    }

    let ranges: Vec<TimeRange> = existing.iter().map(Booked::range).collect();
    if let Some(conflict) = range::first_conflict(&ranges, candidate) {
        return Err(Rejection {
            kind: RejectionKind::Overlap,
            candidate,
            conflict: Some(conflict),
        });
    }
    Ok(())
}

/// Failure to record an entry.
#[derive(Debug, Error)]
pub enum RecordError<E: std::error::Error + 'static> {
    #[error("entry rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("log store failed")]
    Store(#[source] E),
}

/// Validates `candidate` against its day in `store`, then inserts it.
///
/// The store must hold the day steady between the read and the insert (for
/// example by running inside a write transaction); this function takes no
/// locks of its own.
pub fn record_log<S: LogStore>(
    store: &mut S,
    candidate: NewTimeLog,
) -> Result<TimeLog, RecordError<S::Error>> {
    let existing = store
        .list_logs_for_day(&candidate.user_id, candidate.date)
        .map_err(RecordError::Store)?;

    if let Err(rejection) = validate(&existing, candidate.range) {
        tracing::debug!(
            user_id = %candidate.user_id,
            date = %candidate.date,
            %rejection,
            "candidate rejected"
        );
        return Err(rejection.into());
    }

    let log = store.insert_log(candidate).map_err(RecordError::Store)?;
    tracing::info!(
        id = %log.id,
        date = %log.date,
        range = %log.range,
        "time log recorded"
    );
    Ok(log)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::clock::{Slot, range};
    use crate::entry::fixtures::{log, new_log};
    use crate::types::{LogId, UserId};

    #[derive(Default)]
    struct MemoryStore {
        logs: Vec<TimeLog>,
    }

    impl LogStore for MemoryStore {
        type Error = Infallible;

        fn list_logs(&self, user_id: &UserId) -> Result<Vec<TimeLog>, Self::Error> {
            Ok(self
                .logs
                .iter()
                .filter(|l| &l.user_id == user_id)
                .cloned()
                .collect())
        }

        fn list_logs_for_day(
            &self,
            user_id: &UserId,
            date: NaiveDate,
        ) -> Result<Vec<TimeLog>, Self::Error> {
            Ok(self
                .list_logs(user_id)?
                .into_iter()
                .filter(|l| l.date == date)
                .collect())
        }

        fn insert_log(&mut self, candidate: NewTimeLog) -> Result<TimeLog, Self::Error> {
            let id = LogId::new(format!("log-{}", self.logs.len() + 1)).unwrap();
            let log = TimeLog::from_new(id, candidate, Utc::now());
            self.logs.push(log.clone());
            Ok(log)
        }
    }

    #[test]
    fn adjacent_candidate_is_accepted() {
        let existing = [range("09:00", "10:00")];
        assert_eq!(validate(&existing, range("10:00", "11:00")), Ok(()));
    }

    #[test]
    fn overlapping_candidate_is_rejected() {
        let existing = [log("a", "2026-03-02", "09:00", "10:00", "act_1", "sat_1")];
        let err = validate(&existing, range("09:30", "10:30")).unwrap_err();
        assert_eq!(err.kind, RejectionKind::Overlap);
        assert_eq!(err.conflict, Some(range("09:00", "10:00")));
        assert_eq!(
            err.to_string(),
            "overlap: 09:30-10:30 overlaps existing entry 09:00-10:00"
        );
    }

    #[test]
    fn order_is_checked_before_overlap() {
        let existing = [range("09:00", "10:00")];
        let err = validate(&existing, range("10:00", "09:30")).unwrap_err();
        assert_eq!(err.kind, RejectionKind::InvalidOrder);
        assert_eq!(err.conflict, None);

        let err = validate::<TimeRange>(&[], range("12:00", "12:00")).unwrap_err();
        assert_eq!(err.kind, RejectionKind::InvalidOrder);
    }

    #[test]
    fn full_day_suggestion_is_rejected() {
        let existing = [range("00:00", "24:00")];
        let candidate = TimeRange::new(Slot::END_OF_DAY, Slot::END_OF_DAY);
        assert_eq!(
            validate(&existing, candidate).unwrap_err().kind,
            RejectionKind::InvalidOrder
        );
    }

    #[test]
    fn verdict_matches_overlap_for_every_candidate() {
        let existing = [range("06:00", "08:00"), range("12:00", "13:30")];
        for start in Slot::all() {
            for end in Slot::all().filter(|e| *e > start) {
                let candidate = TimeRange::new(start, end);
                let verdict = validate(&existing, candidate);
                assert_eq!(
                    verdict.is_ok(),
                    !range::overlaps(&existing, candidate),
                    "{candidate}"
                );
                assert_eq!(verdict, validate(&existing, candidate));
            }
        }
    }

    #[test]
    fn rejection_serializes_kind_in_kebab_case() {
        let err = validate(&[range("09:00", "10:00")], range("09:30", "10:30")).unwrap_err();
        let json = serde_json::to_value(err).unwrap();
        assert_eq!(json["kind"], "overlap");
        assert_eq!(json["conflict"]["start"], "09:00");
    }

    #[test]
    fn record_log_inserts_valid_entries() {
        let mut store = MemoryStore::default();
        record_log(&mut store, new_log("2026-03-02", "09:00", "10:00", "act_1", "sat_1")).unwrap();
        record_log(&mut store, new_log("2026-03-02", "10:00", "11:00", "act_2", "sat_2")).unwrap();
        // Same slot on another day is fine.
        record_log(&mut store, new_log("2026-03-03", "09:00", "10:00", "act_1", "sat_1")).unwrap();
        assert_eq!(store.logs.len(), 3);
    }

    #[test]
    fn record_log_refuses_double_booking() {
        let mut store = MemoryStore::default();
        record_log(&mut store, new_log("2026-03-02", "09:00", "10:00", "act_1", "sat_1")).unwrap();

        let err = record_log(&mut store, new_log("2026-03-02", "09:30", "10:30", "act_1", "sat_1"))
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Rejected(Rejection {
                kind: RejectionKind::Overlap,
                ..
            })
        ));
        assert_eq!(store.logs.len(), 1);
    }
}
