//! Storage layer for the timejoy ledger.
//!
//! Provides persistence for time logs and the activity type / satisfaction
//! tag catalog using `rusqlite`, and implements the [`LogStore`] and
//! [`CatalogStore`] interfaces of `tj-core`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Share it across threads behind a `Mutex<Database>` or open one per thread.
//!
//! # Recording entries
//!
//! [`Database::record_log`] runs the day lookup, the overlap check and the
//! insert inside one `BEGIN IMMEDIATE` transaction. SQLite admits a single
//! writer at a time, so no other connection can slip an entry into the same
//! day between the check and the insert.
//!
//! # Schema
//!
//! Dates are stored as `YYYY-MM-DD`, slot boundaries as `HH:MM`, and
//! `created_at` as ISO 8601 UTC. The `duration` column is redundant with
//! `start_time`/`end_time` and is cross-checked whenever a row is read.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use thiserror::Error;
use uuid::Uuid;

use tj_core::catalog::{default_activity_types, default_satisfaction_tags};
use tj_core::{
    ActivityType, ActivityTypeId, Catalog, CatalogStore, ClockError, LogId, LogStore, NewTimeLog,
    RecordError, SatisfactionTag, SatisfactionTagId, Score, Slot, TimeLog, TimeRange, UserId,
    ValidationError,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored date is not `YYYY-MM-DD`.
    #[error("invalid date for {row_id}: {value}")]
    DateParse {
        row_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored start or end time is off the slot grid.
    #[error("invalid time for {row_id}")]
    TimeParse {
        row_id: String,
        #[source]
        source: ClockError,
    },
    /// Failed to parse a `created_at` timestamp.
    #[error("invalid timestamp for {row_id}: {value}")]
    TimestampParse {
        row_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The stored duration disagrees with the stored times.
    #[error("duration of {row_id} is {stored}h but its times span {derived}h")]
    DurationMismatch {
        row_id: String,
        stored: f64,
        derived: f64,
    },
    /// An id or score column failed validation.
    #[error("invalid row {row_id}")]
    InvalidRow {
        row_id: String,
        #[source]
        source: ValidationError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A log row as stored, before validation.
#[derive(Debug)]
struct LogRecord {
    id: String,
    user_id: String,
    date: String,
    start_time: String,
    end_time: String,
    duration: f64,
    activity_type_id: String,
    satisfaction_tag_id: String,
    details: Option<String>,
    created_at: String,
}

impl LogRecord {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            duration: row.get(5)?,
            activity_type_id: row.get(6)?,
            satisfaction_tag_id: row.get(7)?,
            details: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    fn into_time_log(self) -> Result<TimeLog, DbError> {
        let invalid = |source| DbError::InvalidRow {
            row_id: self.id.clone(),
            source,
        };
        let bad_time = |source| DbError::TimeParse {
            row_id: self.id.clone(),
            source,
        };

        let date = parse_date(&self.date, &self.id)?;
        let start: Slot = self.start_time.parse().map_err(bad_time)?;
        let end: Slot = self.end_time.parse().map_err(bad_time)?;
        let range = TimeRange::new(start, end);

        let derived = range.hours();
        if (self.duration - derived).abs() > f64::EPSILON {
            return Err(DbError::DurationMismatch {
                row_id: self.id.clone(),
                stored: self.duration,
                derived,
            });
        }

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|source| DbError::TimestampParse {
                row_id: self.id.clone(),
                value: self.created_at.clone(),
                source,
            })?;

        Ok(TimeLog {
            id: LogId::new(self.id.clone()).map_err(invalid)?,
            user_id: UserId::new(self.user_id.clone()).map_err(invalid)?,
            date,
            range,
            activity_type_id: ActivityTypeId::new(self.activity_type_id.clone())
                .map_err(invalid)?,
            satisfaction_tag_id: SatisfactionTagId::new(self.satisfaction_tag_id.clone())
                .map_err(invalid)?,
            details: self.details,
            created_at,
        })
    }
}

const LOG_COLUMNS: &str = "id, user_id, date, start_time, end_time, duration, \
     activity_type_id, satisfaction_tag_id, details, created_at";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is initialized and an empty catalog seeded on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS activity_types (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                is_visible INTEGER NOT NULL DEFAULT 1,
                order_index INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS satisfaction_tags (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                emoji TEXT NOT NULL DEFAULT '',
                is_visible INTEGER NOT NULL DEFAULT 1,
                order_index INTEGER NOT NULL,
                score INTEGER NOT NULL CHECK (score IN (-1, 0, 1))
            );

            -- Logs table: one row per recorded block of time
            -- date: 'YYYY-MM-DD'; start_time/end_time: 'HH:MM' on the half-hour grid
            -- duration: hours, always end_time - start_time
            CREATE TABLE IF NOT EXISTS logs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                duration REAL NOT NULL,
                activity_type_id TEXT NOT NULL,
                satisfaction_tag_id TEXT NOT NULL,
                details TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_logs_user_date ON logs(user_id, date);
            ",
        )?;
        self.seed_catalog()?;
        Ok(())
    }

    /// Fills an empty activity type or satisfaction tag table with defaults.
    fn seed_catalog(&self) -> Result<(), DbError> {
        let types: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM activity_types", [], |row| row.get(0))?;
        if types == 0 {
            let mut stmt = self.conn.prepare(
                "INSERT INTO activity_types (id, name, color, is_visible, order_index)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            for t in default_activity_types() {
                stmt.execute(params![t.id.as_str(), t.name, t.color, t.is_visible, t.order])?;
            }
            tracing::warn!("seeded default activity types");
        }

        let tags: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM satisfaction_tags", [], |row| {
                row.get(0)
            })?;
        if tags == 0 {
            let mut stmt = self.conn.prepare(
                "INSERT INTO satisfaction_tags
                     (id, name, color, emoji, is_visible, order_index, score)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )?;
            for t in default_satisfaction_tags() {
                stmt.execute(params![
                    t.id.as_str(),
                    t.name,
                    t.color,
                    t.emoji,
                    t.is_visible,
                    t.order,
                    t.score.value(),
                ])?;
            }
            tracing::warn!("seeded default satisfaction tags");
        }
        Ok(())
    }

    /// Validates and stores a new entry atomically.
    ///
    /// The candidate is rejected when its range is inverted or overlaps an
    /// entry of the same user and day.
    pub fn record_log(&mut self, candidate: NewTimeLog) -> Result<TimeLog, RecordError<DbError>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RecordError::Store(e.into()))?;
        let log = tj_core::record_log(&mut ConnStore(&*tx), candidate)?;
        tx.commit().map_err(|e| RecordError::Store(e.into()))?;
        Ok(log)
    }

    /// Loads both catalog lists.
    pub fn catalog(&self) -> Result<Catalog, DbError> {
        Ok(Catalog::new(
            self.list_activity_types()?,
            self.list_satisfaction_tags()?,
        ))
    }

    /// Number of logs recorded by a user.
    pub fn count_logs(&self, user_id: &UserId) -> Result<usize, DbError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM logs WHERE user_id = ?",
            [user_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// The most recent day a user logged time on.
    pub fn last_log_date(&self, user_id: &UserId) -> Result<Option<NaiveDate>, DbError> {
        let date: Option<String> = self
            .conn
            .query_row(
                "SELECT MAX(date) FROM logs WHERE user_id = ?",
                [user_id.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        date.map(|d| parse_date(&d, user_id.as_str())).transpose()
    }
}

impl LogStore for Database {
    type Error = DbError;

    fn list_logs(&self, user_id: &UserId) -> Result<Vec<TimeLog>, DbError> {
        ConnStore(&self.conn).list_logs(user_id)
    }

    fn list_logs_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<TimeLog>, DbError> {
        ConnStore(&self.conn).list_logs_for_day(user_id, date)
    }

    fn insert_log(&mut self, candidate: NewTimeLog) -> Result<TimeLog, DbError> {
        ConnStore(&self.conn).insert_log(candidate)
    }
}

impl CatalogStore for Database {
    type Error = DbError;

    fn list_activity_types(&self) -> Result<Vec<ActivityType>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, name, color, is_visible, order_index
            FROM activity_types
            ORDER BY order_index ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })?;
        let mut types = Vec::new();
        for row in rows {
            let (id, name, color, is_visible, order) = row?;
            let id = ActivityTypeId::new(id.clone())
                .map_err(|source| DbError::InvalidRow { row_id: id, source })?;
            types.push(ActivityType {
                id,
                name,
                color,
                is_visible,
                order,
            });
        }
        Ok(types)
    }

    fn list_satisfaction_tags(&self) -> Result<Vec<SatisfactionTag>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, name, color, emoji, is_visible, order_index, score
            FROM satisfaction_tags
            ORDER BY order_index ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, bool>(4)?,
                row.get::<_, u32>(5)?,
                row.get::<_, i64>(6)?,
            ))
        })?;
        let mut tags = Vec::new();
        for row in rows {
            let (id, name, color, emoji, is_visible, order, score) = row?;
            let invalid = |source| DbError::InvalidRow {
                row_id: id.clone(),
                source,
            };
            tags.push(SatisfactionTag {
                id: SatisfactionTagId::new(id.clone()).map_err(invalid)?,
                score: Score::try_from(score).map_err(invalid)?,
                name,
                color,
                emoji,
                is_visible,
                order,
            });
        }
        Ok(tags)
    }
}

/// Log queries over a borrowed connection or open transaction.
struct ConnStore<'a>(&'a Connection);

impl ConnStore<'_> {
    fn query_logs(&self, sql: &str, args: &[&str]) -> Result<Vec<TimeLog>, DbError> {
        let mut stmt = self.0.prepare(sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args), LogRecord::from_row)?;
        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?.into_time_log()?);
        }
        Ok(logs)
    }
}

impl LogStore for ConnStore<'_> {
    type Error = DbError;

    fn list_logs(&self, user_id: &UserId) -> Result<Vec<TimeLog>, DbError> {
        self.query_logs(
            &format!(
                "SELECT {LOG_COLUMNS} FROM logs WHERE user_id = ? \
                 ORDER BY date ASC, start_time ASC, id ASC"
            ),
            &[user_id.as_str()],
        )
    }

    fn list_logs_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<TimeLog>, DbError> {
        let date = format_date(date);
        self.query_logs(
            &format!(
                "SELECT {LOG_COLUMNS} FROM logs WHERE user_id = ? AND date = ? \
                 ORDER BY start_time ASC, id ASC"
            ),
            &[user_id.as_str(), &date],
        )
    }

    fn insert_log(&mut self, candidate: NewTimeLog) -> Result<TimeLog, DbError> {
        let raw_id = format!("log_{}", Uuid::new_v4().simple());
        let id = LogId::new(raw_id.clone())
            .map_err(|source| DbError::InvalidRow { row_id: raw_id, source })?;
        let log = TimeLog::from_new(id, candidate, Utc::now());

        self.0.execute(
            &format!("INSERT INTO logs ({LOG_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"),
            params![
                log.id.as_str(),
                log.user_id.as_str(),
                format_date(log.date),
                log.range.start.to_string(),
                log.range.end.to_string(),
                log.duration_hours(),
                log.activity_type_id.as_str(),
                log.satisfaction_tag_id.as_str(),
                log.details,
                format_timestamp(log.created_at),
            ],
        )?;
        tracing::debug!(id = %log.id, user_id = %log.user_id, "inserted time log");
        Ok(log)
    }
}

fn parse_date(value: &str, row_id: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| DbError::DateParse {
        row_id: row_id.to_string(),
        value: value.to_string(),
        source,
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tj_core::RejectionKind;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn candidate(user_id: &str, day: &str, start: &str, end: &str) -> NewTimeLog {
        NewTimeLog {
            user_id: user(user_id),
            date: date(day),
            range: TimeRange::new(start.parse().unwrap(), end.parse().unwrap()),
            activity_type_id: ActivityTypeId::new("act_1").unwrap(),
            satisfaction_tag_id: SatisfactionTagId::new("sat_1").unwrap(),
            details: Some("writing".to_string()),
        }
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("prepare table_info");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query table_info");
        rows.map(|row| row.expect("table_info row")).collect()
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        assert_eq!(
            table_columns(&db.conn, "logs"),
            vec![
                "id",
                "user_id",
                "date",
                "start_time",
                "end_time",
                "duration",
                "activity_type_id",
                "satisfaction_tag_id",
                "details",
                "created_at",
            ]
        );
        assert_eq!(
            table_columns(&db.conn, "activity_types"),
            vec!["id", "name", "color", "is_visible", "order_index"]
        );
        assert_eq!(
            table_columns(&db.conn, "satisfaction_tags"),
            vec![
                "id",
                "name",
                "color",
                "emoji",
                "is_visible",
                "order_index",
                "score"
            ]
        );
    }

    #[test]
    fn empty_database_is_seeded_with_default_catalog() {
        let db = Database::open_in_memory().unwrap();
        let catalog = db.catalog().unwrap();
        assert_eq!(catalog.types(), default_activity_types().as_slice());
        assert_eq!(catalog.tags(), default_satisfaction_tags().as_slice());
    }

    #[test]
    fn reopening_does_not_duplicate_catalog() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("tj.db");
        {
            let mut db = Database::open(&path).unwrap();
            db.record_log(candidate("u1", "2026-03-02", "09:00", "10:00"))
                .unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.list_activity_types().unwrap().len(), 3);
        assert_eq!(db.list_satisfaction_tags().unwrap().len(), 3);
        assert_eq!(db.count_logs(&user("u1")).unwrap(), 1);
    }

    #[test]
    fn customized_catalog_is_kept() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "UPDATE activity_types SET is_visible = 0, order_index = 9 WHERE id = 'act_1'",
                [],
            )
            .unwrap();
        db.init().unwrap();

        let catalog = db.catalog().unwrap();
        let visible: Vec<&str> = catalog
            .visible_types()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(visible, vec!["act_2", "act_3"]);
        assert_eq!(catalog.types().last().unwrap().id.as_str(), "act_1");
    }

    #[test]
    fn recorded_log_round_trips() {
        let mut db = Database::open_in_memory().unwrap();
        let stored = db
            .record_log(candidate("u1", "2026-03-02", "09:00", "10:30"))
            .unwrap();
        assert!(stored.id.as_str().starts_with("log_"));

        let logs = db.list_logs(&user("u1")).unwrap();
        assert_eq!(logs.len(), 1);
        let log = &logs[0];
        assert_eq!(log.id, stored.id);
        assert_eq!(log.range.to_string(), "09:00-10:30");
        assert_eq!(log.details.as_deref(), Some("writing"));
        assert!((log.duration_hours() - 1.5).abs() < f64::EPSILON);
        assert_eq!(
            log.created_at.timestamp_millis(),
            stored.created_at.timestamp_millis()
        );
    }

    #[test]
    fn day_listing_filters_by_user_and_date() {
        let mut db = Database::open_in_memory().unwrap();
        db.record_log(candidate("u1", "2026-03-02", "13:00", "14:00"))
            .unwrap();
        db.record_log(candidate("u1", "2026-03-02", "09:00", "10:00"))
            .unwrap();
        db.record_log(candidate("u1", "2026-03-03", "09:00", "10:00"))
            .unwrap();
        db.record_log(candidate("u2", "2026-03-02", "09:00", "10:00"))
            .unwrap();

        let day = db.list_logs_for_day(&user("u1"), date("2026-03-02")).unwrap();
        let ranges: Vec<String> = day.iter().map(|l| l.range.to_string()).collect();
        assert_eq!(ranges, vec!["09:00-10:00", "13:00-14:00"]);
        assert_eq!(db.count_logs(&user("u2")).unwrap(), 1);
    }

    #[test]
    fn overlapping_record_is_rejected_and_not_stored() {
        let mut db = Database::open_in_memory().unwrap();
        db.record_log(candidate("u1", "2026-03-02", "09:00", "10:00"))
            .unwrap();

        let err = db
            .record_log(candidate("u1", "2026-03-02", "09:30", "10:30"))
            .unwrap_err();
        match err {
            RecordError::Rejected(rejection) => {
                assert_eq!(rejection.kind, RejectionKind::Overlap);
                assert_eq!(rejection.conflict.unwrap().to_string(), "09:00-10:00");
            }
            RecordError::Store(e) => panic!("unexpected store error: {e}"),
        }
        assert_eq!(db.count_logs(&user("u1")).unwrap(), 1);
    }

    #[test]
    fn inverted_record_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        let err = db
            .record_log(candidate("u1", "2026-03-02", "11:00", "10:00"))
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Rejected(r) if r.kind == RejectionKind::InvalidOrder
        ));
        assert_eq!(db.count_logs(&user("u1")).unwrap(), 0);
    }

    #[test]
    fn tampered_duration_is_reported() {
        let mut db = Database::open_in_memory().unwrap();
        let stored = db
            .record_log(candidate("u1", "2026-03-02", "09:00", "10:00"))
            .unwrap();
        db.conn
            .execute(
                "UPDATE logs SET duration = 3.0 WHERE id = ?",
                [stored.id.as_str()],
            )
            .unwrap();

        let err = db.list_logs(&user("u1")).unwrap_err();
        assert!(matches!(err, DbError::DurationMismatch { .. }));
    }

    #[test]
    fn off_grid_time_is_reported() {
        let mut db = Database::open_in_memory().unwrap();
        let stored = db
            .record_log(candidate("u1", "2026-03-02", "09:00", "10:00"))
            .unwrap();
        db.conn
            .execute(
                "UPDATE logs SET start_time = '09:15' WHERE id = ?",
                [stored.id.as_str()],
            )
            .unwrap();

        let err = db.list_logs(&user("u1")).unwrap_err();
        assert!(matches!(
            err,
            DbError::TimeParse {
                source: ClockError::OffGrid { .. },
                ..
            }
        ));
    }

    #[test]
    fn last_log_date_tracks_latest_day() {
        let mut db = Database::open_in_memory().unwrap();
        assert_eq!(db.last_log_date(&user("u1")).unwrap(), None);
        db.record_log(candidate("u1", "2026-03-05", "09:00", "10:00"))
            .unwrap();
        db.record_log(candidate("u1", "2026-03-02", "09:00", "10:00"))
            .unwrap();
        assert_eq!(
            db.last_log_date(&user("u1")).unwrap(),
            Some(date("2026-03-05"))
        );
    }
}
