//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use regex::Regex;

/// Pre-compiled regex for relative day parsing.
static RELATIVE_DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+days?\s+ago$").unwrap());

/// Conservative bound for relative day parsing (~1000 years).
const MAX_RELATIVE_DAYS: i64 = 1000 * 365;

/// Parse a day as either `YYYY-MM-DD` or relative to `today`.
///
/// Supports:
/// - ISO 8601 date: "2026-03-02"
/// - Keywords: "today", "yesterday"
/// - Relative: "1 day ago", "3 days ago"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    match s {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = RELATIVE_DAYS_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD, 'today', 'yesterday' \
             or relative (e.g., '3 days ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    if n > MAX_RELATIVE_DAYS {
        anyhow::bail!("Relative date too far back: {n} days");
    }
    Ok(today - Duration::days(n))
}

/// Formats hours with one decimal, e.g. `1.5h`.
pub fn hours(value: f64) -> String {
    format!("{value:.1}h")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    #[test]
    fn parses_iso_date() {
        assert_eq!(
            parse_date("2026-02-28", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
    }

    #[test]
    fn parses_keywords() {
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("yesterday", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
    }

    #[test]
    fn parses_relative_days() {
        assert_eq!(
            parse_date("1 day ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
        assert_eq!(
            parse_date("7 days ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 25).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_date("next tuesday", today()).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
        assert!(parse_date("2026-02-30", today()).is_err());
    }

    #[test]
    fn rejects_huge_relative_values() {
        let err = parse_date("999999 days ago", today()).unwrap_err();
        assert!(err.to_string().contains("too far back"));
    }

    #[test]
    fn formats_hours_with_one_decimal() {
        assert_eq!(hours(1.5), "1.5h");
        assert_eq!(hours(0.0), "0.0h");
    }
}
