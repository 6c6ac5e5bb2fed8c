//! Storage layer for focus.
//!
//! Provides persistence for samples, sessions and focus-mode violations using
//! `rusqlite`, implementing the store traits from `focus-core`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! The sampler and the report pipeline write to the same store, so in-process
//! sharing goes through [`SharedDatabase`], which serializes every logical
//! operation behind a mutex. [`SharedDatabase`] is the entry point for an
//! in-process sampler running alongside the report pipeline; the `focus` CLI
//! runs one command per process and opens a plain [`Database`]. Writers in
//! other processes are serialized by
//! `SQLite` itself; [`Database::set_busy_timeout`] makes them wait instead of
//! failing.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in ISO 8601 format with millisecond precision
//! (e.g., `2024-01-15T10:30:00.000Z`). Because every value uses the same format:
//! - Lexicographic ordering matches chronological ordering
//! - Range queries can compare strings directly
//! - Values are human-readable in the database
//!
//! ## Sessions
//!
//! `focus_sessions` is derived data. A day's rows are replaced as a unit by
//! [`Database::replace_sessions`] inside one transaction, so readers never see
//! a half-rebuilt day.

mod shared;

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use focus_core::{AppId, Event, EventStore, Session, SessionStore, Violation, ViolationStore};
use rusqlite::{Connection, Transaction, params};
use thiserror::Error;

pub use shared::SharedDatabase;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp in {table} row {row_id}: {timestamp}")]
    TimestampParse {
        table: &'static str,
        row_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored value could not be mapped back to a domain type.
    #[error("invalid {table} row {row_id}: {message}")]
    InvalidRow {
        table: &'static str,
        row_id: String,
        message: String,
    },
    /// Another thread panicked while holding the shared database.
    #[error("database lock poisoned")]
    Poisoned,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.conn
            .execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
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

    /// Sets how long a write waits for another connection's lock.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<(), DbError> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Raw foreground-application samples
            CREATE TABLE IF NOT EXISTS app_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                app_id TEXT NOT NULL,
                app_name TEXT NOT NULL,
                is_idle INTEGER NOT NULL DEFAULT 0,
                window_title TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_app_events_timestamp ON app_events(timestamp);

            -- Sessions derived from app_events, rebuilt per day
            CREATE TABLE IF NOT EXISTS focus_sessions (
                id TEXT PRIMARY KEY,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                app_id TEXT NOT NULL,
                app_name TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                ended_by_idle INTEGER NOT NULL DEFAULT 0,
                window_title TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_focus_sessions_start ON focus_sessions(start_time);

            -- Blocked applications used while focus mode was on
            CREATE TABLE IF NOT EXISTS focus_violations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                app_id TEXT NOT NULL,
                app_name TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_focus_violations_timestamp ON focus_violations(timestamp);
            ",
        )?;
        Ok(())
    }

    /// Inserts a batch of samples in one transaction.
    pub fn insert_events(&mut self, events: &[Event]) -> Result<usize, DbError> {
        self.insert_batch(events, &[])
    }

    /// Inserts samples and the violations they produced in one transaction.
    ///
    /// If any row fails nothing is written, so the batch can be retried
    /// without duplicating samples.
    pub fn insert_batch(
        &mut self,
        events: &[Event],
        violations: &[Violation],
    ) -> Result<usize, DbError> {
        if events.is_empty() && violations.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO app_events (timestamp, app_id, app_name, is_idle, window_title)
                VALUES (?, ?, ?, ?, ?)
                ",
            )?;
            for event in events {
                inserted += stmt.execute(params![
                    format_timestamp(event.timestamp),
                    event.app_id.as_str(),
                    event.app_name,
                    event.is_idle,
                    event.window_title.as_deref().filter(|t| !t.is_empty()),
                ])?;
            }
        }
        for violation in violations {
            insert_violation_tx(&tx, violation)?;
        }
        tx.commit()?;
        tracing::debug!(
            event_count = inserted,
            violation_count = violations.len(),
            "inserted batch"
        );
        Ok(inserted)
    }

    /// Lists samples within a time range, ordered by timestamp then insertion.
    ///
    /// The range is inclusive of `start` and exclusive of `end`.
    pub fn list_events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, DbError> {
        if end <= start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "
            SELECT id, timestamp, app_id, app_name, is_idle, window_title
            FROM app_events
            WHERE timestamp >= ? AND timestamp < ?
            ORDER BY timestamp ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([format_timestamp(start), format_timestamp(end)], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                app_id: row.get(2)?,
                app_name: row.get(3)?,
                is_idle: row.get(4)?,
                window_title: row.get(5)?,
            })
        })?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?.into_event()?);
        }
        Ok(events)
    }

    /// Lists sessions starting within a time range, ordered by start time.
    pub fn list_sessions_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, DbError> {
        if end <= start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "
            SELECT id, start_time, end_time, app_id, app_name, duration_secs, ended_by_idle, window_title
            FROM focus_sessions
            WHERE start_time >= ? AND start_time < ?
            ORDER BY start_time ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([format_timestamp(start), format_timestamp(end)], |row| {
            Ok(SessionRow {
                id: row.get(0)?,
                start_time: row.get(1)?,
                end_time: row.get(2)?,
                app_id: row.get(3)?,
                app_name: row.get(4)?,
                duration_secs: row.get(5)?,
                ended_by_idle: row.get(6)?,
                window_title: row.get(7)?,
            })
        })?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?.into_session()?);
        }
        Ok(sessions)
    }

    /// Deletes sessions starting within a time range.
    pub fn delete_sessions_in_range(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<usize, DbError> {
        let deleted = self.conn.execute(
            "DELETE FROM focus_sessions WHERE start_time >= ? AND start_time < ?",
            params![format_timestamp(start), format_timestamp(end)],
        )?;
        Ok(deleted)
    }

    /// Inserts a single session.
    pub fn insert_session(&mut self, session: &Session) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        insert_session_tx(&tx, session)?;
        tx.commit()?;
        Ok(())
    }

    /// Replaces every session starting within a time range.
    ///
    /// Runs in one transaction: if any insert fails the delete is rolled back
    /// and the previous sessions remain.
    pub fn replace_sessions(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        sessions: &[Session],
    ) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM focus_sessions WHERE start_time >= ? AND start_time < ?",
            params![format_timestamp(start), format_timestamp(end)],
        )?;
        for session in sessions {
            insert_session_tx(&tx, session)?;
        }
        tx.commit()?;
        tracing::debug!(deleted, inserted = sessions.len(), "replaced sessions");
        Ok(())
    }

    /// Records a focus-mode violation.
    pub fn insert_violation(&mut self, violation: &Violation) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        insert_violation_tx(&tx, violation)?;
        tx.commit()?;
        Ok(())
    }

    /// Counts violations within a time range.
    pub fn count_violations_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<usize, DbError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM focus_violations WHERE timestamp >= ? AND timestamp < ?",
            params![format_timestamp(start), format_timestamp(end)],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Lists the most recent violations within a time range, newest first.
    pub fn list_violations_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Violation>, DbError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "
            SELECT id, timestamp, app_id, app_name
            FROM focus_violations
            WHERE timestamp >= ? AND timestamp < ?
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            ",
        )?;
        let rows = stmt.query_map(
            params![format_timestamp(start), format_timestamp(end), limit],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;
        let mut violations = Vec::new();
        for row in rows {
            let (id, timestamp, app_id, app_name) = row?;
            let row_id = id.to_string();
            violations.push(Violation {
                timestamp: parse_timestamp(&timestamp, "focus_violations", &row_id)?,
                app_id: AppId::or_unknown(Some(&app_id)),
                app_name: non_empty_name(app_name),
            });
        }
        Ok(violations)
    }
}

fn insert_violation_tx(tx: &Transaction<'_>, violation: &Violation) -> Result<(), DbError> {
    tx.execute(
        "INSERT INTO focus_violations (timestamp, app_id, app_name) VALUES (?, ?, ?)",
        params![
            format_timestamp(violation.timestamp),
            violation.app_id.as_str(),
            violation.app_name,
        ],
    )?;
    Ok(())
}

fn insert_session_tx(tx: &Transaction<'_>, session: &Session) -> Result<(), DbError> {
    tx.execute(
        "
        INSERT INTO focus_sessions
        (id, start_time, end_time, app_id, app_name, duration_secs, ended_by_idle, window_title)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ",
        params![
            session.id,
            format_timestamp(session.start_time),
            format_timestamp(session.end_time),
            session.app_id.as_str(),
            session.app_name,
            session.duration_secs,
            session.ended_by_idle,
            session.window_title,
        ],
    )?;
    Ok(())
}

#[derive(Debug)]
struct EventRow {
    id: i64,
    timestamp: String,
    app_id: String,
    app_name: String,
    is_idle: bool,
    window_title: Option<String>,
}

impl EventRow {
    fn into_event(self) -> Result<Event, DbError> {
        let timestamp = parse_timestamp(&self.timestamp, "app_events", &self.id.to_string())?;
        Ok(Event {
            timestamp,
            app_id: AppId::or_unknown(Some(&self.app_id)),
            app_name: non_empty_name(self.app_name),
            is_idle: self.is_idle,
            window_title: self.window_title.filter(|t| !t.is_empty()),
        })
    }
}

#[derive(Debug)]
struct SessionRow {
    id: String,
    start_time: String,
    end_time: String,
    app_id: String,
    app_name: String,
    duration_secs: i64,
    ended_by_idle: bool,
    window_title: Option<String>,
}

impl SessionRow {
    fn into_session(self) -> Result<Session, DbError> {
        let start_time = parse_timestamp(&self.start_time, "focus_sessions", &self.id)?;
        let end_time = parse_timestamp(&self.end_time, "focus_sessions", &self.id)?;
        if end_time < start_time {
            return Err(DbError::InvalidRow {
                table: "focus_sessions",
                row_id: self.id,
                message: "end_time precedes start_time".to_string(),
            });
        }
        Ok(Session {
            id: self.id,
            start_time,
            end_time,
            app_id: AppId::or_unknown(Some(&self.app_id)),
            app_name: non_empty_name(self.app_name),
            duration_secs: self.duration_secs,
            ended_by_idle: self.ended_by_idle,
            window_title: self.window_title,
        })
    }
}

fn non_empty_name(name: String) -> String {
    if name.trim().is_empty() {
        focus_core::UNKNOWN_APP.to_string()
    } else {
        name
    }
}

fn parse_timestamp(
    timestamp: &str,
    table: &'static str,
    row_id: &str,
) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            table,
            row_id: row_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl EventStore for Database {
    type Error = DbError;

    fn append(&mut self, event: &Event) -> Result<(), DbError> {
        self.insert_events(std::slice::from_ref(event))?;
        Ok(())
    }

    fn fetch_events(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Event>, DbError> {
        self.list_events_in_range(start, end)
    }
}

impl SessionStore for Database {
    type Error = DbError;

    fn delete_sessions(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<usize, DbError> {
        self.delete_sessions_in_range(start, end)
    }

    fn insert_session(&mut self, session: &Session) -> Result<(), DbError> {
        Self::insert_session(self, session)
    }

    fn fetch_sessions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, DbError> {
        self.list_sessions_in_range(start, end)
    }

    fn replace_sessions(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        sessions: &[Session],
    ) -> Result<(), DbError> {
        Self::replace_sessions(self, start, end, sessions)
    }
}

impl ViolationStore for Database {
    type Error = DbError;

    fn record_violation(&mut self, violation: &Violation) -> Result<(), DbError> {
        self.insert_violation(violation)
    }

    fn violation_count(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<usize, DbError> {
        self.count_violations_in_range(start, end)
    }

    fn violations(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Violation>, DbError> {
        self.list_violations_in_range(start, end, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::{NaiveDate, TimeZone};
    use focus_core::{DayRange, SessionizerConfig, rebuild_sessions};

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        assert_eq!(table_columns(&db.conn, "app_events"), vec![
            "id",
            "timestamp",
            "app_id",
            "app_name",
            "is_idle",
            "window_title",
        ]);
        assert_eq!(table_columns(&db.conn, "focus_sessions"), vec![
            "id",
            "start_time",
            "end_time",
            "app_id",
            "app_name",
            "duration_secs",
            "ended_by_idle",
            "window_title",
        ]);
        assert_eq!(table_columns(&db.conn, "focus_violations"), vec![
            "id",
            "timestamp",
            "app_id",
            "app_name",
        ]);

        assert!(index_names(&db.conn, "app_events").contains("idx_app_events_timestamp"));
        assert!(index_names(&db.conn, "focus_sessions").contains("idx_focus_sessions_start"));
        assert!(
            index_names(&db.conn, "focus_violations").contains("idx_focus_violations_timestamp")
        );
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

    fn index_names(conn: &Connection, table: &str) -> HashSet<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA index_list({table})"))
            .expect("prepare index_list");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query index_list");
        rows.map(|row| row.expect("index_list row")).collect()
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, 10, 0, 0).unwrap() + chrono::Duration::seconds(secs)
    }

    fn event(secs: i64, app: &str) -> Event {
        Event::new(ts(secs), AppId::new(app).unwrap(), app.to_uppercase())
    }

    fn day() -> DayRange {
        DayRange::in_timezone(NaiveDate::from_ymd_opt(2025, 1, 29).unwrap(), &Utc).unwrap()
    }

    #[test]
    fn events_are_returned_in_timestamp_order() {
        let mut db = Database::open_in_memory().unwrap();
        let inserted = db
            .insert_events(&[event(10, "b"), event(0, "a"), event(5, "a")])
            .unwrap();
        assert_eq!(inserted, 3);

        let events = db.list_events_in_range(day().start, day().end).unwrap();
        let offsets: Vec<DateTime<Utc>> = events.iter().map(|e| e.timestamp).collect();
        assert_eq!(offsets, vec![ts(0), ts(5), ts(10)]);
        assert_eq!(events[2].app_name, "B");
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_events(&[event(0, "first"), event(0, "second")])
            .unwrap();

        let events = db.list_events_in_range(day().start, day().end).unwrap();
        assert_eq!(events[0].app_id.as_str(), "first");
        assert_eq!(events[1].app_id.as_str(), "second");
    }

    #[test]
    fn event_range_is_half_open() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&event(0, "a")).unwrap();
        db.append(&event(60, "a")).unwrap();

        let events = db.fetch_events(ts(0), ts(60)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, ts(0));

        assert!(db.fetch_events(ts(60), ts(0)).unwrap().is_empty());
    }

    #[test]
    fn idle_flag_and_title_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&event(0, "com.google.Chrome").with_title("GitHub"))
            .unwrap();
        db.append(&event(2, "com.google.Chrome").idle()).unwrap();

        let events = db.fetch_events(day().start, day().end).unwrap();
        assert_eq!(events[0].window_title.as_deref(), Some("GitHub"));
        assert!(!events[0].is_idle);
        assert_eq!(events[1].window_title, None);
        assert!(events[1].is_idle);
    }

    #[test]
    fn blank_identifiers_read_back_as_unknown() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO app_events (timestamp, app_id, app_name, is_idle) VALUES (?, '', '', 0)",
                [format_timestamp(ts(0))],
            )
            .unwrap();

        let events = db.fetch_events(day().start, day().end).unwrap();
        assert_eq!(events[0].app_id.as_str(), "unknown");
        assert_eq!(events[0].app_name, "unknown");
    }

    #[test]
    fn corrupt_timestamp_is_reported() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO app_events (timestamp, app_id, app_name) VALUES ('2025-01-29T10:00:00.000Zjunk', 'a', 'A')",
                [],
            )
            .unwrap();

        let err = db.fetch_events(day().start, day().end).unwrap_err();
        assert!(matches!(err, DbError::TimestampParse { table: "app_events", .. }));
    }

    #[test]
    fn rebuild_writes_sessions_and_is_idempotent() {
        let mut db = Database::open_in_memory().unwrap();
        let events: Vec<Event> = (0..=20)
            .map(|i| event(i * 3, if i <= 10 { "a" } else { "b" }))
            .collect();
        db.insert_events(&events).unwrap();

        let config = SessionizerConfig::default();
        rebuild_sessions(&mut db, &day(), &config).unwrap();
        let first = db.fetch_sessions(day().start, day().end).unwrap();
        rebuild_sessions(&mut db, &day(), &config).unwrap();
        let second = db.fetch_sessions(day().start, day().end).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(first[0].duration_secs, 30);
        assert_eq!(first[1].start_time, ts(33));
    }

    #[test]
    fn failed_replace_keeps_previous_sessions() {
        let mut db = Database::open_in_memory().unwrap();
        let original = Session::new(ts(0), ts(30), AppId::new("a").unwrap(), "A", false);
        db.replace_sessions(day().start, day().end, std::slice::from_ref(&original))
            .unwrap();

        // Two sessions with the same start and app share an id, so the second
        // insert violates the primary key after the delete already ran.
        let duplicate = Session::new(ts(100), ts(130), AppId::new("b").unwrap(), "B", false);
        let result = db.replace_sessions(day().start, day().end, &[
            duplicate.clone(),
            duplicate,
        ]);
        assert!(matches!(result, Err(DbError::Sqlite(_))));

        let sessions = db.fetch_sessions(day().start, day().end).unwrap();
        assert_eq!(sessions, vec![original]);
    }

    #[test]
    fn replace_only_touches_the_given_range() {
        let mut db = Database::open_in_memory().unwrap();
        let yesterday = Session::new(
            ts(-86_400),
            ts(-86_300),
            AppId::new("a").unwrap(),
            "A",
            false,
        );
        db.insert_session(&yesterday).unwrap();

        db.replace_sessions(day().start, day().end, &[]).unwrap();
        let remaining = db.fetch_sessions(ts(-90_000), day().end).unwrap();
        assert_eq!(remaining, vec![yesterday]);
    }

    #[test]
    fn delete_sessions_reports_count() {
        let mut db = Database::open_in_memory().unwrap();
        for offset in [0, 100, 200] {
            db.insert_session(&Session::new(
                ts(offset),
                ts(offset + 20),
                AppId::new("a").unwrap(),
                "A",
                false,
            ))
            .unwrap();
        }
        assert_eq!(db.delete_sessions(ts(0), ts(150)).unwrap(), 2);
        assert_eq!(db.fetch_sessions(day().start, day().end).unwrap().len(), 1);
    }

    #[test]
    fn violations_are_counted_and_listed_newest_first() {
        let mut db = Database::open_in_memory().unwrap();
        for (offset, app) in [(0, "com.spotify.client"), (30, "com.hnc.Discord"), (60, "com.apple.mail")] {
            db.record_violation(&Violation {
                timestamp: ts(offset),
                app_id: AppId::new(app).unwrap(),
                app_name: app.to_string(),
            })
            .unwrap();
        }

        assert_eq!(db.violation_count(day().start, day().end).unwrap(), 3);
        assert_eq!(db.violation_count(ts(1), ts(60)).unwrap(), 1);

        let recent = db.violations(day().start, day().end, 2).unwrap();
        let apps: Vec<&str> = recent.iter().map(|v| v.app_id.as_str()).collect();
        assert_eq!(apps, vec!["com.apple.mail", "com.hnc.Discord"]);
    }

    #[test]
    fn failed_violation_write_discards_the_whole_batch() {
        let mut db = Database::open_in_memory().unwrap();
        db.conn
            .execute_batch(
                "CREATE TRIGGER reject_violations BEFORE INSERT ON focus_violations
                 BEGIN SELECT RAISE(ABORT, 'violations rejected'); END;",
            )
            .unwrap();

        let sample = event(0, "com.spotify.client");
        let violation = Violation {
            timestamp: sample.timestamp,
            app_id: sample.app_id.clone(),
            app_name: sample.app_name.clone(),
        };
        let result = db.insert_batch(&[event(-5, "a"), sample], &[violation]);

        assert!(matches!(result, Err(DbError::Sqlite(_))));
        assert!(db.fetch_events(day().start, day().end).unwrap().is_empty());
        assert_eq!(db.violation_count(day().start, day().end).unwrap(), 0);
    }

    #[test]
    fn batch_writes_samples_and_violations_together() {
        let mut db = Database::open_in_memory().unwrap();
        let sample = event(0, "com.spotify.client");
        let violation = Violation {
            timestamp: sample.timestamp,
            app_id: sample.app_id.clone(),
            app_name: sample.app_name.clone(),
        };

        assert_eq!(db.insert_batch(&[sample], &[violation]).unwrap(), 1);
        assert_eq!(db.fetch_events(day().start, day().end).unwrap().len(), 1);
        assert_eq!(db.violation_count(day().start, day().end).unwrap(), 1);
    }

    #[test]
    fn open_on_disk_persists_between_connections() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("focus.db");

        {
            let mut db = Database::open(&path).unwrap();
            db.set_busy_timeout(Duration::from_millis(500)).unwrap();
            db.append(&event(0, "a")).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.fetch_events(day().start, day().end).unwrap().len(), 1);
    }
}
