//! Time log entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::TimeRange;
use crate::types::{ActivityTypeId, LogId, SatisfactionTagId, UserId};

/// Anything that books a range of slots on a day.
///
/// Lets the range and validation functions work over stored logs, candidates
/// or bare ranges alike.
pub trait Booked {
    fn range(&self) -> TimeRange;
}

impl Booked for TimeRange {
    fn range(&self) -> TimeRange {
        *self
    }
}

/// A candidate entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeLog {
    pub user_id: UserId,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub range: TimeRange,
    pub activity_type_id: ActivityTypeId,
    pub satisfaction_tag_id: SatisfactionTagId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl NewTimeLog {
    /// Hours covered by the candidate range.
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        self.range.hours()
    }
}

impl Booked for NewTimeLog {
    fn range(&self) -> TimeRange {
        self.range
    }
}

/// A recorded block of time. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLog {
    pub id: LogId,
    pub user_id: UserId,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub range: TimeRange,
    pub activity_type_id: ActivityTypeId,
    pub satisfaction_tag_id: SatisfactionTagId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TimeLog {
    /// Stamps a validated candidate with its identity.
    #[must_use]
    pub fn from_new(id: LogId, new: NewTimeLog, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            date: new.date,
            range: new.range,
            activity_type_id: new.activity_type_id,
            satisfaction_tag_id: new.satisfaction_tag_id,
            details: new.details,
            created_at,
        }
    }

    /// Duration in hours, always derived from the range.
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        self.range.hours()
    }
}

impl Booked for TimeLog {
    fn range(&self) -> TimeRange {
        self.range
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;
    use crate::clock::range;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn new_log(day: &str, start: &str, end: &str, activity: &str, tag: &str) -> NewTimeLog {
        NewTimeLog {
            user_id: UserId::new("user-1").unwrap(),
            date: date(day),
            range: range(start, end),
            activity_type_id: ActivityTypeId::new(activity).unwrap(),
            satisfaction_tag_id: SatisfactionTagId::new(tag).unwrap(),
            details: None,
        }
    }

    pub fn log(id: &str, day: &str, start: &str, end: &str, activity: &str, tag: &str) -> TimeLog {
        TimeLog::from_new(
            LogId::new(id).unwrap(),
            new_log(day, start, end, activity, tag),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    #[expect(clippy::float_cmp, reason = "half-hour multiples are exact")]
    fn duration_is_derived_from_range() {
        assert_eq!(
            log("a", "2026-03-02", "09:00", "10:30", "act_1", "sat_1").duration_hours(),
            1.5
        );
        assert_eq!(
            new_log("2026-03-02", "23:30", "24:00", "act_1", "sat_1").duration_hours(),
            0.5
        );
    }

    #[test]
    fn serializes_with_flat_times() {
        let entry = log("a", "2026-03-02", "09:00", "10:30", "act_1", "sat_1");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["start"], "09:00");
        assert_eq!(value["end"], "10:30");
        assert_eq!(value["date"], "2026-03-02");
        assert!(value.get("details").is_none());
    }
}
