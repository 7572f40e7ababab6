//! Logs command for listing recorded entries.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use tj_core::analytics::{LogRow, RECENT_DAYS, recent_logs};
use tj_core::{LogStore, UserId};
use tj_db::Database;

use super::util::hours;

pub fn format_rows(rows: &[LogRow], all: bool) -> String {
    if rows.is_empty() {
        return if all {
            "No logs recorded.\n".to_string()
        } else {
            format!("No logs in the last {RECENT_DAYS} days.\n")
        };
    }

    let mut output = String::new();
    for row in rows {
        let mut line = format!(
            "{}  {}-{}  {:>5}  {:<22} {} {}",
            row.date,
            row.start,
            row.end,
            hours(row.duration),
            row.activity,
            row.emoji,
            row.satisfaction
        );
        if let Some(details) = &row.details {
            line.push_str("  ");
            line.push_str(details);
        }
        output.push_str(&line);
        output.push('\n');
    }
    output
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    user_id: &UserId,
    today: NaiveDate,
    all: bool,
    json: bool,
) -> Result<()> {
    let logs = db.list_logs(user_id).context("failed to load logs")?;
    let catalog = db.catalog().context("failed to load catalog")?;
    let rows = recent_logs(&logs, &catalog, today, all);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?;
    } else {
        write!(writer, "{}", format_rows(&rows, all))?;
    }
    Ok(())
}
