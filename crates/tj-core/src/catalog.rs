//! Activity types and satisfaction tags.
//!
//! Both lists are managed outside the engine. The [`Catalog`] wraps a snapshot
//! of them and answers display lookups with explicit fallbacks, so a log that
//! references a deleted row still renders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ActivityTypeId, SatisfactionTagId, Score};

/// Color used when a referenced row no longer exists.
pub const NEUTRAL_COLOR: &str = "#9CA3AF";

/// Errors resolving a requested catalog entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown or hidden activity type: {id}")]
    UnknownActivityType { id: String },

    #[error("unknown or hidden satisfaction tag: {id}")]
    UnknownSatisfactionTag { id: String },

    #[error("no visible activity types configured")]
    NoActivityTypes,

    #[error("no visible satisfaction tags configured")]
    NoSatisfactionTags,
}

/// An activity category such as "Daily Projects".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityType {
    pub id: ActivityTypeId,
    pub name: String,
    pub color: String,
    pub is_visible: bool,
    /// 1-based display position.
    pub order: u32,
}

/// How an entry felt, with the score used for happiness analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatisfactionTag {
    pub id: SatisfactionTagId,
    pub name: String,
    pub color: String,
    pub emoji: String,
    pub is_visible: bool,
    pub order: u32,
    pub score: Score,
}

fn activity(id: &str, name: &str, color: &str, order: u32) -> ActivityType {
    ActivityType {
        id: ActivityTypeId(id.to_string()),
        name: name.to_string(),
        color: color.to_string(),
        is_visible: true,
        order,
    }
}

fn tag(
    id: &str,
    name: &str,
    color: &str,
    emoji: &str,
    order: u32,
    score: Score,
) -> SatisfactionTag {
    SatisfactionTag {
        id: SatisfactionTagId(id.to_string()),
        name: name.to_string(),
        color: color.to_string(),
        emoji: emoji.to_string(),
        is_visible: true,
        order,
        score,
    }
}

/// Activity types used when the store has none configured.
pub fn default_activity_types() -> Vec<ActivityType> {
    vec![
        activity("act_1", "Daily Projects", "#3B82F6", 1),
        activity("act_2", "Life & Family", "#10B981", 2),
        activity("act_3", "Long-term Investment", "#8B5CF6", 3),
    ]
}

/// Satisfaction tags used when the store has none configured.
pub fn default_satisfaction_tags() -> Vec<SatisfactionTag> {
    vec![
        tag("sat_1", "Happy", "#FBBF24", "😊", 1, Score::Positive),
        tag("sat_2", "OK", NEUTRAL_COLOR, "😐", 2, Score::Neutral),
        tag("sat_3", "Not so good", "#EF4444", "😞", 3, Score::Negative),
    ]
}

/// A snapshot of both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    types: Vec<ActivityType>,
    tags: Vec<SatisfactionTag>,
}

impl Catalog {
    #[must_use]
    pub const fn new(types: Vec<ActivityType>, tags: Vec<SatisfactionTag>) -> Self {
        Self { types, tags }
    }

    pub fn types(&self) -> &[ActivityType] {
        &self.types
    }

    pub fn tags(&self) -> &[SatisfactionTag] {
        &self.tags
    }

    /// Visible activity types in display order (ties broken by id).
    pub fn visible_types(&self) -> Vec<&ActivityType> {
        let mut visible: Vec<_> = self.types.iter().filter(|t| t.is_visible).collect();
        visible.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        visible
    }

    /// Visible satisfaction tags in display order (ties broken by id).
    pub fn visible_tags(&self) -> Vec<&SatisfactionTag> {
        let mut visible: Vec<_> = self.tags.iter().filter(|t| t.is_visible).collect();
        visible.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        visible
    }

    pub fn activity_type(&self, id: &ActivityTypeId) -> Option<&ActivityType> {
        self.types.iter().find(|t| &t.id == id)
    }

    pub fn satisfaction_tag(&self, id: &SatisfactionTagId) -> Option<&SatisfactionTag> {
        self.tags.iter().find(|t| &t.id == id)
    }

    /// Display name, or the raw id when the type is gone.
    pub fn type_name<'a>(&'a self, id: &'a ActivityTypeId) -> &'a str {
        self.activity_type(id).map_or(id.as_str(), |t| t.name.as_str())
    }

    pub fn type_color(&self, id: &ActivityTypeId) -> &str {
        self.activity_type(id).map_or(NEUTRAL_COLOR, |t| t.color.as_str())
    }

    /// Display name, or the raw id when the tag is gone.
    pub fn tag_name<'a>(&'a self, id: &'a SatisfactionTagId) -> &'a str {
        self.satisfaction_tag(id).map_or(id.as_str(), |t| t.name.as_str())
    }

    pub fn tag_color(&self, id: &SatisfactionTagId) -> &str {
        self.satisfaction_tag(id).map_or(NEUTRAL_COLOR, |t| t.color.as_str())
    }

    /// Unknown tags never count as happy.
    pub fn is_happy(&self, id: &SatisfactionTagId) -> bool {
        self.satisfaction_tag(id).is_some_and(|t| t.score.is_happy())
    }

    /// First visible activity type in display order.
    pub fn default_activity(&self) -> Option<&ActivityTypeId> {
        self.visible_types().first().map(|t| &t.id)
    }

    /// First visible satisfaction tag in display order.
    pub fn default_tag(&self) -> Option<&SatisfactionTagId> {
        self.visible_tags().first().map(|t| &t.id)
    }

    /// Resolves a requested activity type, or falls back to `default`.
    ///
    /// A requested id must name a visible type; it is never silently replaced.
    pub fn resolve_activity(
        &self,
        requested: Option<&str>,
        default: Option<&ActivityTypeId>,
    ) -> Result<ActivityTypeId, CatalogError> {
        match requested {
            Some(id) => self
                .types
                .iter()
                .find(|t| t.is_visible && t.id.as_str() == id)
                .map(|t| t.id.clone())
                .ok_or_else(|| CatalogError::UnknownActivityType { id: id.to_string() }),
            None => default.cloned().ok_or(CatalogError::NoActivityTypes),
        }
    }

    /// Resolves a requested satisfaction tag, or falls back to `default`.
    pub fn resolve_tag(
        &self,
        requested: Option<&str>,
        default: Option<&SatisfactionTagId>,
    ) -> Result<SatisfactionTagId, CatalogError> {
        match requested {
            Some(id) => self
                .tags
                .iter()
                .find(|t| t.is_visible && t.id.as_str() == id)
                .map(|t| t.id.clone())
                .ok_or_else(|| CatalogError::UnknownSatisfactionTag { id: id.to_string() }),
            None => default.cloned().ok_or(CatalogError::NoSatisfactionTags),
        }
    }
}
