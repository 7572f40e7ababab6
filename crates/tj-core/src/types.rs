//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A satisfaction score outside {-1, 0, 1}.
    #[error("satisfaction score must be -1, 0 or 1, got {value}")]
    ScoreOutOfRange { value: i64 },
}

/// How a satisfaction tag feels, used as the "happy" classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Score {
    Negative,
    Neutral,
    Positive,
}

impl Score {
    /// Numeric value as stored and serialized.
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Self::Negative => -1,
            Self::Neutral => 0,
            Self::Positive => 1,
        }
    }

    /// Whether time under this score counts as happy time.
    #[must_use]
    pub const fn is_happy(self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl TryFrom<i64> for Score {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Negative),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Positive),
            _ => Err(ValidationError::ScoreOutOfRange { value }),
        }
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        score.value()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub(crate) String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated time log identifier.
    ///
    /// Assigned by the log store at insert time; uniqueness is enforced there.
    LogId, "log ID"
);

define_string_id!(
    /// A validated user identifier.
    UserId, "user ID"
);

define_string_id!(
    /// A validated activity type identifier (e.g. `act_1`).
    ActivityTypeId, "activity type ID"
);

define_string_id!(
    /// A validated satisfaction tag identifier (e.g. `sat_1`).
    SatisfactionTagId, "satisfaction tag ID"
);
