//! The half-hour clock grid.
//!
//! A day is divided into 48 slots of 30 minutes. Slot boundaries are indexed
//! `0..=48`, where `48` is `24:00` and only valid as the end of a range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes covered by one slot.
pub const SLOT_MINUTES: u8 = 30;

/// Number of slots in a day.
pub const SLOTS_PER_DAY: u8 = 48;

/// Errors from parsing or constructing slot boundaries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Not an `HH:MM` string.
    #[error("invalid time {value:?}, expected HH:MM")]
    Malformed { value: String },

    /// Minutes other than `00` or `30`.
    #[error("time {value} is not on a 30-minute boundary")]
    OffGrid { value: String },

    /// Outside `00:00`..=`24:00`.
    #[error("time {value} is outside 00:00-24:00")]
    OutOfRange { value: String },
}

/// A slot boundary on the half-hour grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot(u8);

impl Slot {
    /// `00:00`.
    pub const START_OF_DAY: Self = Self(0);

    /// `24:00`.
    pub const END_OF_DAY: Self = Self(SLOTS_PER_DAY);

    /// Creates a slot from its index, rejecting anything past `24:00`.
    pub fn new(index: u8) -> Result<Self, ClockError> {
        if index > SLOTS_PER_DAY {
            return Err(ClockError::OutOfRange {
                value: format!("slot {index}"),
            });
        }
        Ok(Self(index))
    }

    /// Index in `0..=48`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The following boundary, clamped at `24:00`.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.0 >= SLOTS_PER_DAY {
            Self::END_OF_DAY
        } else {
            Self(self.0 + 1)
        }
    }

    /// All 49 selectable boundaries, `00:00` through `24:00`.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=SLOTS_PER_DAY).map(Self)
    }
}

impl FromStr for Slot {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClockError::Malformed {
            value: s.to_string(),
        };

        let (hours, minutes) = s.split_once(':').ok_or_else(malformed)?;
        let all_digits = |field: &str| field.bytes().all(|b| b.is_ascii_digit());
        if hours.is_empty()
            || hours.len() > 2
            || minutes.len() != 2
            || !all_digits(hours)
            || !all_digits(minutes)
        {
            return Err(malformed());
        }
        let hours: u8 = hours.parse().map_err(|_| malformed())?;
        let minutes: u8 = minutes.parse().map_err(|_| malformed())?;

        let half = match minutes {
            0 => 0,
            30 => 1,
            m if m < 60 => {
                return Err(ClockError::OffGrid {
                    value: s.to_string(),
                });
            }
            _ => return Err(malformed()),
        };

        let out_of_range = || ClockError::OutOfRange {
            value: s.to_string(),
        };
        if hours > SLOTS_PER_DAY / 2 {
            return Err(out_of_range());
        }
        let index = hours * 2 + half;
        if index > SLOTS_PER_DAY {
            return Err(out_of_range());
        }
        Ok(Self(index))
    }
}

impl TryFrom<String> for Slot {
    type Error = ClockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 2;
        let minutes = (self.0 % 2) * SLOT_MINUTES;
        write!(f, "{hours:02}:{minutes:02}")
    }
}

/// A half-open `[start, end)` range of slots within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Slot,
    pub end: Slot,
}

impl TimeRange {
    #[must_use]
    pub const fn new(start: Slot, end: Slot) -> Self {
        Self { start, end }
    }

    /// Number of slots covered; zero for empty or inverted ranges.
    #[must_use]
    pub const fn len_slots(&self) -> u8 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Length in hours (one slot is half an hour).
    #[must_use]
    pub fn hours(&self) -> f64 {
        f64::from(self.len_slots()) * f64::from(SLOT_MINUTES) / 60.0
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len_slots() == 0
    }

    /// Whether the slot starting at `slot` falls inside this range.
    #[must_use]
    pub fn contains(&self, slot: Slot) -> bool {
        self.start <= slot && slot < self.end
    }

    /// Half-open intersection test.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
pub(crate) fn slot(time: &str) -> Slot {
    time.parse().unwrap()
}

#[cfg(test)]
pub(crate) fn range(start: &str, end: &str) -> TimeRange {
    TimeRange::new(slot(start), slot(end))
}
