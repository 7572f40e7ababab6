//! Dashboard command for the daily and weekly summaries.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use tj_core::{Dashboard, LogStore, UserId};
use tj_db::Database;

use super::util::hours;

pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let mut output = format!("Dashboard for {}\n", dashboard.today);

    output.push_str("\nToday\n");
    for total in &dashboard.today_totals {
        output.push_str(&format!(
            "  {:<22} {} / {}\n",
            total.name,
            hours(total.hours),
            hours(total.benchmark)
        ));
    }

    output.push_str("\nThis week vs last week\n");
    for row in &dashboard.weekly_comparison {
        output.push_str(&format!(
            "  {:<22} {}  last week {}\n",
            row.name,
            hours(row.this_week),
            hours(row.last_week)
        ));
    }

    output.push_str("\nDistribution this week\n");
    let week_total = dashboard
        .weekly_distribution
        .iter()
        .fold(0.0, |acc, s| acc + s.hours);
    if dashboard.weekly_distribution.is_empty() {
        output.push_str("  Nothing logged yet.\n");
    }
    for slice in &dashboard.weekly_distribution {
        output.push_str(&format!(
            "  {:<22} {}  {:.1}%\n",
            slice.name,
            hours(slice.hours),
            slice.hours / week_total * 100.0
        ));
    }

    output.push_str("\nHow it felt this week\n");
    for breakdown in &dashboard.weekly_emotion {
        let tags: Vec<String> = breakdown
            .tags
            .iter()
            .map(|t| format!("{} {}", t.name, hours(t.hours)))
            .collect();
        output.push_str(&format!(
            "  {:<22} {}  {}\n",
            breakdown.name,
            hours(breakdown.total_hours),
            tags.join(", ")
        ));
    }

    output.push_str("\nHappiness by week\n");
    if dashboard.happiness_trend.is_empty() {
        output.push_str("  Nothing logged yet.\n");
    }
    for point in &dashboard.happiness_trend {
        output.push_str(&format!(
            "  {}  {} of {} happy ({:.1}%)\n",
            point.week,
            hours(point.happy_hours),
            hours(point.total_hours),
            point.happy_rate
        ));
    }

    let missing = &dashboard.missing_yesterday;
    output.push_str(&format!(
        "\nYesterday ({}): {} logged, {} missing\n",
        missing.date,
        hours(missing.logged_hours),
        hours(missing.missing_hours)
    ));
    output
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    user_id: &UserId,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let logs = db.list_logs(user_id).context("failed to load logs")?;
    let catalog = db.catalog().context("failed to load catalog")?;
    let dashboard = Dashboard::build(&logs, &catalog, today);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&dashboard)?)?;
    } else {
        write!(writer, "{}", format_dashboard(&dashboard))?;
    }
    Ok(())
}
