//! Log command for recording a block of time.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use tj_core::{LogStore, NewTimeLog, RecordError, Slot, TimeRange, UserId, suggest_next_slot};
use tj_db::Database;

use super::util::hours;

/// Fields of a new entry as given on the command line.
#[derive(Debug, Default)]
pub struct LogRequest {
    pub start: Option<Slot>,
    pub end: Option<Slot>,
    pub activity: Option<String>,
    pub tag: Option<String>,
    pub details: Option<String>,
}

/// Fills in missing fields and records the entry.
///
/// A missing start continues from the day's latest entry; a missing end is
/// one slot after the start. Rejections are returned as errors carrying the
/// rejection reason.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user_id: &UserId,
    date: NaiveDate,
    request: LogRequest,
) -> Result<()> {
    let catalog = db.catalog().context("failed to load catalog")?;
    let activity_type_id =
        catalog.resolve_activity(request.activity.as_deref(), catalog.default_activity())?;
    let satisfaction_tag_id =
        catalog.resolve_tag(request.tag.as_deref(), catalog.default_tag())?;

    let start = match request.start {
        Some(start) => start,
        None => {
            let day = db
                .list_logs_for_day(user_id, date)
                .context("failed to load day")?;
            suggest_next_slot(&day).range.start
        }
    };
    let end = request.end.unwrap_or_else(|| start.next());

    let candidate = NewTimeLog {
        user_id: user_id.clone(),
        date,
        range: TimeRange::new(start, end),
        activity_type_id,
        satisfaction_tag_id,
        details: request.details,
    };

    let log = match db.record_log(candidate) {
        Ok(log) => log,
        Err(RecordError::Rejected(rejection)) => {
            anyhow::bail!("cannot log {date}: {rejection}")
        }
        Err(RecordError::Store(e)) => {
            return Err(e).context("failed to record time log");
        }
    };

    let tag = catalog.satisfaction_tag(&log.satisfaction_tag_id);
    writeln!(
        writer,
        "Logged {} {} ({}) {} {}",
        log.date,
        log.range,
        hours(log.duration_hours()),
        catalog.type_name(&log.activity_type_id),
        tag.map_or("", |t| t.emoji.as_str()),
    )?;
    Ok(())
}
