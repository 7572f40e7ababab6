//! Gaps command for showing unlogged time within a day.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use tj_core::range::{gaps, slot_choices};
use tj_core::{LogStore, Slot, TimeRange, UserId};
use tj_db::Database;

use super::util::hours;

/// Free time of one day.
#[derive(Debug, Serialize)]
pub struct GapsReport {
    pub date: NaiveDate,
    pub logged_hours: f64,
    pub free_hours: f64,
    pub gaps: Vec<TimeRange>,
    /// One character per half hour: `#` logged, `.` free.
    #[serde(skip)]
    pub timeline: String,
}

pub fn build_report(db: &Database, user_id: &UserId, date: NaiveDate) -> Result<GapsReport> {
    let day = db
        .list_logs_for_day(user_id, date)
        .context("failed to load day")?;
    let ranges: Vec<TimeRange> = day.iter().map(|log| log.range).collect();

    let free = gaps(&ranges);
    Ok(GapsReport {
        date,
        logged_hours: total_hours(&ranges),
        free_hours: total_hours(&free),
        gaps: free,
        timeline: timeline(&ranges),
    })
}

fn total_hours(ranges: &[TimeRange]) -> f64 {
    ranges.iter().map(TimeRange::hours).fold(0.0, |acc, h| acc + h)
}

fn timeline(ranges: &[TimeRange]) -> String {
    slot_choices(ranges)
        .iter()
        .take_while(|choice| choice.slot < Slot::END_OF_DAY)
        .map(|choice| if choice.occupied { '#' } else { '.' })
        .collect()
}

pub fn format_report(report: &GapsReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{}: {} logged, {} free\n",
        report.date,
        hours(report.logged_hours),
        hours(report.free_hours)
    ));
    output.push_str(&format!("00 {} 24\n", report.timeline));
    if report.gaps.is_empty() {
        output.push_str("No free time.\n");
    }
    for gap in &report.gaps {
        output.push_str(&format!("  {gap} ({})\n", hours(gap.hours())));
    }
    output
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    user_id: &UserId,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    let report = build_report(db, user_id, date)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&report))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{date, record, user};

    use insta::assert_snapshot;

    fn gaps_output(db: &Database, day: &str, json: bool) -> String {
        let mut output = Vec::new();
        run(&mut output, db, &user(), date(day), json).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn lists_free_ranges_and_timeline() {
        let mut db = Database::open_in_memory().unwrap();
        record(&mut db, "2026-03-02", "13:00", "14:00", "act_1", "sat_1");
        record(&mut db, "2026-03-02", "09:00", "10:00", "act_2", "sat_2");

        assert_snapshot!(gaps_output(&db, "2026-03-02", false), @r"
        2026-03-02: 2.0h logged, 22.0h free
        00 ..................##......##.................... 24
          00:00-09:00 (9.0h)
          10:00-13:00 (3.0h)
          14:00-24:00 (10.0h)
        ");
    }

    #[test]
    fn full_day_has_no_gaps() {
        let mut db = Database::open_in_memory().unwrap();
        record(&mut db, "2026-03-02", "00:00", "12:00", "act_1", "sat_1");
        record(&mut db, "2026-03-02", "12:00", "24:00", "act_2", "sat_1");

        let output = gaps_output(&db, "2026-03-02", false);
        assert!(output.contains("24.0h logged, 0.0h free"));
        assert!(output.ends_with("No free time.\n"));
    }

    #[test]
    fn empty_day_reports_unsigned_zero() {
        let db = Database::open_in_memory().unwrap();
        assert_snapshot!(gaps_output(&db, "2026-03-02", false), @r"
        2026-03-02: 0.0h logged, 24.0h free
        00 ................................................ 24
          00:00-24:00 (24.0h)
        ");
    }

    #[test]
    fn json_output_lists_gaps() {
        let mut db = Database::open_in_memory().unwrap();
        record(&mut db, "2026-03-02", "00:00", "23:00", "act_1", "sat_1");

        let value: serde_json::Value =
            serde_json::from_str(&gaps_output(&db, "2026-03-02", true)).unwrap();
        assert_eq!(value["date"], "2026-03-02");
        assert_eq!(value["free_hours"], 1.0);
        assert_eq!(value["gaps"][0]["start"], "23:00");
        assert_eq!(value["gaps"][0]["end"], "24:00");
    }
}
