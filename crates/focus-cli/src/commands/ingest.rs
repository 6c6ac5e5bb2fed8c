//! Ingest command: appends sampler output from stdin to the event store.
//!
//! Input is JSON Lines, one sample per line:
//!
//! ```text
//! {"timestamp":"2025-01-29T10:00:00Z","app_id":"com.apple.Terminal","app_name":"Terminal"}
//! {"timestamp":"2025-01-29T10:00:02Z","app_id":"com.apple.Terminal","is_idle":true}
//! ```
//!
//! The whole batch is parsed before anything is written, so a malformed line
//! leaves the store untouched. Samples and the focus-mode violations they
//! produce are then written in a single transaction.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use focus_core::{AppId, Event, FocusMode, Violation};
use focus_db::Database;

/// Counts written by one ingest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    pub events: usize,
    pub violations: usize,
}

pub fn run<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    db: &mut Database,
    focus_mode: &FocusMode,
) -> Result<IngestOutcome> {
    let events = parse_events(reader)?;
    let outcome = store_events(db, &events, focus_mode)?;

    writeln!(
        writer,
        "Ingested {} samples ({} focus-mode violations)",
        outcome.events, outcome.violations
    )?;
    Ok(outcome)
}

fn store_events(
    db: &mut Database,
    events: &[Event],
    focus_mode: &FocusMode,
) -> Result<IngestOutcome> {
    let violations: Vec<Violation> = events
        .iter()
        .filter_map(|event| focus_mode.check(event))
        .collect();
    let inserted = db
        .insert_batch(events, &violations)
        .context("failed to store samples")?;

    Ok(IngestOutcome {
        events: inserted,
        violations: violations.len(),
    })
}

fn parse_events<R: BufRead>(reader: R) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parsed: SampleLine = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        let event = parsed
            .into_event()
            .with_context(|| format!("invalid sample on line {}", idx + 1))?;
        events.push(event);
    }
    tracing::debug!(event_count = events.len(), "parsed samples");
    Ok(events)
}

#[derive(Debug, Deserialize)]
struct SampleLine {
    timestamp: String,
    #[serde(default)]
    app_id: Option<String>,
    #[serde(default)]
    app_name: Option<String>,
    #[serde(default)]
    is_idle: bool,
    #[serde(default)]
    window_title: Option<String>,
}

impl SampleLine {
    fn into_event(self) -> Result<Event> {
        let timestamp = DateTime::parse_from_rfc3339(self.timestamp.trim())
            .with_context(|| format!("invalid timestamp: {}", self.timestamp))?
            .with_timezone(&Utc);
        let app_id = AppId::or_unknown(self.app_id.as_deref());
        let app_name = self
            .app_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| app_id.to_string());

        let mut event = Event::new(timestamp, app_id, app_name);
        if self.is_idle {
            event = event.idle();
        }
        if let Some(title) = self.window_title {
            event = event.with_title(title);
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use chrono::TimeZone;
    use focus_core::{EventStore, FocusModeConfig, ViolationStore};

    fn everything() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn parse_events_fills_defaults() {
        let input = r#"
{"timestamp":"2025-01-29T10:00:00Z","app_id":"com.apple.Terminal","app_name":"Terminal"}

{"timestamp":"2025-01-29T11:00:02+01:00","app_id":"com.apple.Terminal","is_idle":true,"window_title":"  "}
{"timestamp":"2025-01-29T10:00:04Z"}
"#;
        let events = parse_events(Cursor::new(input)).unwrap();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].app_name, "Terminal");
        assert!(!events[0].is_idle);

        assert_eq!(
            events[1].timestamp,
            Utc.with_ymd_and_hms(2025, 1, 29, 10, 0, 2).unwrap()
        );
        assert!(events[1].is_idle);
        assert_eq!(events[1].app_name, "com.apple.Terminal");
        assert_eq!(events[1].window_title, None);

        assert_eq!(events[2].app_id.as_str(), "unknown");
        assert_eq!(events[2].app_name, "unknown");
    }

    #[test]
    fn parse_events_reports_line_of_bad_json() {
        let input = "{\"timestamp\":\"2025-01-29T10:00:00Z\"}\n{not json}\n";
        let err = parse_events(Cursor::new(input)).unwrap_err();
        assert_eq!(err.to_string(), "invalid JSON on line 2");
    }

    #[test]
    fn parse_events_reports_line_of_bad_timestamp() {
        let input = "\n{\"timestamp\":\"yesterday\",\"app_id\":\"a\"}\n";
        let err = parse_events(Cursor::new(input)).unwrap_err();
        assert_eq!(err.to_string(), "invalid sample on line 2");
        assert!(format!("{err:#}").contains("invalid timestamp: yesterday"));
    }

    #[test]
    fn malformed_batch_writes_nothing() {
        let mut db = Database::open_in_memory().unwrap();
        let input = "{\"timestamp\":\"2025-01-29T10:00:00Z\",\"app_id\":\"a\"}\n{\"app_id\":\"b\"}\n";
        let mut out = Vec::new();

        let result = run(Cursor::new(input), &mut out, &mut db, &FocusMode::default());
        assert!(result.is_err());

        let (start, end) = everything();
        assert!(db.fetch_events(start, end).unwrap().is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn run_records_violations_for_blocked_apps() {
        let mut db = Database::open_in_memory().unwrap();
        let focus_mode = FocusMode::new(&FocusModeConfig {
            enabled: true,
            ..FocusModeConfig::default()
        });
        let input = r#"{"timestamp":"2025-01-29T10:00:00Z","app_id":"com.microsoft.VSCode","app_name":"Code"}
{"timestamp":"2025-01-29T10:00:02Z","app_id":"com.spotify.client","app_name":"Spotify"}
{"timestamp":"2025-01-29T10:00:04Z","app_id":"com.spotify.client","app_name":"Spotify","is_idle":true}
"#;
        let mut out = Vec::new();

        let outcome = run(Cursor::new(input), &mut out, &mut db, &focus_mode).unwrap();
        assert_eq!(outcome, IngestOutcome {
            events: 3,
            violations: 1
        });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Ingested 3 samples (1 focus-mode violations)\n"
        );

        let (start, end) = everything();
        assert_eq!(db.violation_count(start, end).unwrap(), 1);
        assert_eq!(db.fetch_events(start, end).unwrap().len(), 3);
    }

    #[test]
    fn rejected_violation_rolls_back_samples() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("focus.db");
        let mut db = Database::open(&path).unwrap();
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_violations BEFORE INSERT ON focus_violations
                 BEGIN SELECT RAISE(ABORT, 'violations rejected'); END;",
            )
            .unwrap();

        let focus_mode = FocusMode::new(&FocusModeConfig {
            enabled: true,
            ..FocusModeConfig::default()
        });
        let input = r#"{"timestamp":"2025-01-29T10:00:00Z","app_id":"com.microsoft.VSCode","app_name":"Code"}
{"timestamp":"2025-01-29T10:00:02Z","app_id":"com.spotify.client","app_name":"Spotify"}
"#;
        let mut out = Vec::new();

        let err = run(Cursor::new(input), &mut out, &mut db, &focus_mode).unwrap_err();
        assert_eq!(err.to_string(), "failed to store samples");

        let (start, end) = everything();
        assert!(db.fetch_events(start, end).unwrap().is_empty());
        assert_eq!(db.violation_count(start, end).unwrap(), 0);
        assert!(out.is_empty());
    }
}
