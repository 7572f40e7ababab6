//! Collaborator interfaces for persistence.
//!
//! The engine never owns state; callers hand it a store that answers these
//! queries from a consistent snapshot.

use chrono::NaiveDate;

use crate::catalog::{ActivityType, SatisfactionTag};
use crate::entry::{NewTimeLog, TimeLog};
use crate::types::UserId;

/// Source and sink of a user's time logs.
pub trait LogStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All logs of a user, in no particular order.
    fn list_logs(&self, user_id: &UserId) -> Result<Vec<TimeLog>, Self::Error>;

    /// Logs of a user on one calendar day.
    fn list_logs_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<TimeLog>, Self::Error>;

    /// Stores a candidate that has already passed validation.
    fn insert_log(&mut self, candidate: NewTimeLog) -> Result<TimeLog, Self::Error>;
}

/// Read-only access to the activity type and satisfaction tag lists.
pub trait CatalogStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_activity_types(&self) -> Result<Vec<ActivityType>, Self::Error>;

    fn list_satisfaction_tags(&self) -> Result<Vec<SatisfactionTag>, Self::Error>;
}
