//! Core engine of the timejoy ledger.
//!
//! This crate contains the pure logic behind logging time:
//! - Clock grid: half-hour slots and wall-clock conversion
//! - Range set: overlap checks and free gaps within a day
//! - Suggestion: default times for the next entry
//! - Validation: refusing double-booked or inverted entries
//! - Analytics: dashboard series over a user's history
//!
//! Persistence lives behind the [`LogStore`] and [`CatalogStore`] traits.

pub mod analytics;
pub mod catalog;
pub mod clock;
mod entry;
pub mod range;
mod store;
mod suggest;
mod types;
mod validate;

pub use analytics::Dashboard;
pub use catalog::{ActivityType, Catalog, CatalogError, SatisfactionTag};
pub use clock::{ClockError, Slot, TimeRange};
pub use entry::{Booked, NewTimeLog, TimeLog};
pub use store::{CatalogStore, LogStore};
pub use suggest::{Suggestion, suggest_next_slot};
pub use types::{ActivityTypeId, LogId, SatisfactionTagId, Score, UserId, ValidationError};
pub use validate::{RecordError, Rejection, RejectionKind, record_log, validate};
