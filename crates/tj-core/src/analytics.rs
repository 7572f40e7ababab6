//! Dashboard aggregations over a user's log history.
//!
//! Every function is pure. The reference day is always passed in as `today`
//! rather than read from the clock. Weeks start on Monday.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::clock::Slot;
use crate::entry::TimeLog;
use crate::types::{ActivityTypeId, LogId, SatisfactionTagId};

/// Reference hours per category shown next to today's totals.
pub const BENCHMARK_HOURS: f64 = 6.0;

/// Hours in a day, for missing-time detection.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Days covered by the default log table.
pub const RECENT_DAYS: i64 = 7;

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Rounds to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Folds from `0.0` so an empty sum is never `-0.0`.
fn sum_hours<'a>(logs: impl Iterator<Item = &'a TimeLog>) -> f64 {
    logs.map(TimeLog::duration_hours).fold(0.0, |acc, h| acc + h)
}

/// Hours logged today for one activity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayTotal {
    pub activity_type_id: ActivityTypeId,
    pub name: String,
    pub color: String,
    pub hours: f64,
    pub benchmark: f64,
}

/// Today's hours per visible activity type, in display order.
///
/// Types with nothing logged report zero rather than being left out.
pub fn today_totals(logs: &[TimeLog], catalog: &Catalog, today: NaiveDate) -> Vec<TodayTotal> {
    catalog
        .visible_types()
        .into_iter()
        .map(|t| TodayTotal {
            activity_type_id: t.id.clone(),
            name: t.name.clone(),
            color: t.color.clone(),
            hours: sum_hours(
                logs.iter()
                    .filter(|l| l.date == today && l.activity_type_id == t.id),
            ),
            benchmark: BENCHMARK_HOURS,
        })
        .collect()
}

/// This week's and last week's hours for one activity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyComparison {
    pub activity_type_id: ActivityTypeId,
    pub name: String,
    pub color: String,
    pub this_week: f64,
    pub last_week: f64,
}

/// Per visible type, hours since this Monday against the seven days before.
///
/// "This week" is open-ended: entries dated after `today` still count.
pub fn weekly_comparison(
    logs: &[TimeLog],
    catalog: &Catalog,
    today: NaiveDate,
) -> Vec<WeeklyComparison> {
    let this_week_start = week_start(today);
    let last_week_start = this_week_start - chrono::Duration::days(7);

    catalog
        .visible_types()
        .into_iter()
        .map(|t| {
            let mut this_week = 0.0;
            let mut last_week = 0.0;
            for log in logs.iter().filter(|l| l.activity_type_id == t.id) {
                if log.date >= this_week_start {
                    this_week += log.duration_hours();
                } else if log.date >= last_week_start {
                    last_week += log.duration_hours();
                }
            }
            WeeklyComparison {
                activity_type_id: t.id.clone(),
                name: t.name.clone(),
                color: t.color.clone(),
                this_week,
                last_week,
            }
        })
        .collect()
}

/// One slice of the weekly activity distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub activity_type_id: ActivityTypeId,
    pub name: String,
    pub color: String,
    pub hours: f64,
}

/// This week's hours per visible type, leaving out types with no time.
pub fn weekly_distribution(
    logs: &[TimeLog],
    catalog: &Catalog,
    today: NaiveDate,
) -> Vec<DistributionSlice> {
    weekly_comparison(logs, catalog, today)
        .into_iter()
        .filter(|row| row.this_week > 0.0)
        .map(|row| DistributionSlice {
            activity_type_id: row.activity_type_id,
            name: row.name,
            color: row.color,
            hours: row.this_week,
        })
        .collect()
}

/// Hours under one satisfaction tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagHours {
    pub satisfaction_tag_id: SatisfactionTagId,
    pub name: String,
    pub color: String,
    pub hours: f64,
}

/// How this week's time in one activity type felt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionBreakdown {
    pub activity_type_id: ActivityTypeId,
    pub name: String,
    pub total_hours: f64,
    pub tags: Vec<TagHours>,
}

/// For each visible type, this week's hours split by visible tag.
pub fn weekly_emotion_by_activity(
    logs: &[TimeLog],
    catalog: &Catalog,
    today: NaiveDate,
) -> Vec<EmotionBreakdown> {
    let this_week_start = week_start(today);
    let this_week: Vec<&TimeLog> = logs.iter().filter(|l| l.date >= this_week_start).collect();
    let visible_tags = catalog.visible_tags();

    catalog
        .visible_types()
        .into_iter()
        .map(|t| {
            let of_type: Vec<&TimeLog> = this_week
                .iter()
                .copied()
                .filter(|l| l.activity_type_id == t.id)
                .collect();
            EmotionBreakdown {
                activity_type_id: t.id.clone(),
                name: t.name.clone(),
                total_hours: sum_hours(of_type.iter().copied()),
                tags: visible_tags
                    .iter()
                    .map(|tag| TagHours {
                        satisfaction_tag_id: tag.id.clone(),
                        name: tag.name.clone(),
                        color: tag.color.clone(),
                        hours: sum_hours(
                            of_type
                                .iter()
                                .copied()
                                .filter(|l| l.satisfaction_tag_id == tag.id),
                        ),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Happy time for one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HappinessPoint {
    /// Monday of the week.
    pub week: NaiveDate,
    /// Hours under a tag with a positive score, one decimal.
    pub happy_hours: f64,
    /// Share of the week's logged hours that were happy, percent, one decimal.
    pub happy_rate: f64,
    pub total_hours: f64,
}

/// Weekly happy hours and happy rate over the whole history, oldest first.
pub fn happiness_trend(logs: &[TimeLog], catalog: &Catalog) -> Vec<HappinessPoint> {
    let mut weeks: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for log in logs {
        let (total, happy) = weeks.entry(week_start(log.date)).or_default();
        let hours = log.duration_hours();
        *total += hours;
        if catalog.is_happy(&log.satisfaction_tag_id) {
            *happy += hours;
        }
    }

    weeks
        .into_iter()
        .map(|(week, (total, happy))| HappinessPoint {
            week,
            happy_hours: round1(happy),
            happy_rate: if total > 0.0 {
                round1(happy / total * 100.0)
            } else {
                0.0
            },
            total_hours: total,
        })
        .collect()
}

/// Unlogged hours of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingTime {
    pub date: NaiveDate,
    pub logged_hours: f64,
    pub missing_hours: f64,
}

/// Hours of yesterday not covered by any entry.
///
/// A plain sum of durations against 24 hours: fragmented gaps are not
/// located, and overlapping entries would understate the missing time.
pub fn missing_yesterday(logs: &[TimeLog], today: NaiveDate) -> MissingTime {
    let yesterday = today - chrono::Duration::days(1);
    let logged = sum_hours(logs.iter().filter(|l| l.date == yesterday));
    MissingTime {
        date: yesterday,
        logged_hours: logged,
        missing_hours: (HOURS_PER_DAY - logged).max(0.0),
    }
}

/// One line of the log table, with names resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRow {
    pub id: LogId,
    pub date: NaiveDate,
    pub start: Slot,
    pub end: Slot,
    pub duration: f64,
    pub activity: String,
    pub satisfaction: String,
    pub emoji: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Log table rows, newest first.
///
/// Unless `all_time` is set only the last [`RECENT_DAYS`] days are kept.
pub fn recent_logs(
    logs: &[TimeLog],
    catalog: &Catalog,
    today: NaiveDate,
    all_time: bool,
) -> Vec<LogRow> {
    let cutoff = today - chrono::Duration::days(RECENT_DAYS);
    let mut selected: Vec<&TimeLog> = logs
        .iter()
        .filter(|l| all_time || l.date >= cutoff)
        .collect();
    selected.sort_by(|a, b| {
        (b.date, b.range.start)
            .cmp(&(a.date, a.range.start))
            .then_with(|| a.id.cmp(&b.id))
    });

    selected
        .into_iter()
        .map(|l| LogRow {
            id: l.id.clone(),
            date: l.date,
            start: l.range.start,
            end: l.range.end,
            duration: l.duration_hours(),
            activity: catalog.type_name(&l.activity_type_id).to_string(),
            satisfaction: catalog.tag_name(&l.satisfaction_tag_id).to_string(),
            emoji: catalog
                .satisfaction_tag(&l.satisfaction_tag_id)
                .map(|t| t.emoji.clone())
                .unwrap_or_default(),
            details: l.details.clone(),
        })
        .collect()
}

/// Every dashboard series for one user, computed against one reference day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub today_totals: Vec<TodayTotal>,
    pub weekly_comparison: Vec<WeeklyComparison>,
    pub weekly_distribution: Vec<DistributionSlice>,
    pub weekly_emotion: Vec<EmotionBreakdown>,
    pub happiness_trend: Vec<HappinessPoint>,
    pub missing_yesterday: MissingTime,
}

impl Dashboard {
    pub fn build(logs: &[TimeLog], catalog: &Catalog, today: NaiveDate) -> Self {
        tracing::debug!(logs = logs.len(), %today, "building dashboard");
        Self {
            today,
            today_totals: today_totals(logs, catalog, today),
            weekly_comparison: weekly_comparison(logs, catalog, today),
            weekly_distribution: weekly_distribution(logs, catalog, today),
            weekly_emotion: weekly_emotion_by_activity(logs, catalog, today),
            happiness_trend: happiness_trend(logs, catalog),
            missing_yesterday: missing_yesterday(logs, today),
        }
    }
}
