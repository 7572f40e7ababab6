//! Suggest command for previewing the next entry's default range.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use tj_core::{LogStore, UserId, suggest_next_slot};
use tj_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    user_id: &UserId,
    date: NaiveDate,
) -> Result<()> {
    let day = db
        .list_logs_for_day(user_id, date)
        .context("failed to load day")?;
    let suggestion = suggest_next_slot(&day);

    if suggestion.day_full {
        writeln!(writer, "{date} is logged through 24:00.")?;
    } else {
        writeln!(writer, "Next slot for {date}: {}", suggestion.range)?;
    }
    Ok(())
}
