//! Violations command: reports blocked applications used during focus mode.

use std::fmt::{Display, Write as _};
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use focus_core::{DayRange, Violation, ViolationStore};
use focus_db::Database;

use super::util::format_clock;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    range: &DayRange,
    limit: usize,
    focus_mode_enabled: bool,
) -> Result<usize> {
    let count = db
        .violation_count(range.start, range.end)
        .context("failed to count violations")?;
    let recent = db
        .violations(range.start, range.end, limit)
        .context("failed to load violations")?;

    if !focus_mode_enabled {
        writeln!(writer, "Focus mode is disabled.")?;
    }
    write!(writer, "{}", format_violations(range, count, &recent, &Local))?;
    Ok(count)
}

/// Renders the count followed by the most recent violations, newest first.
pub fn format_violations<Tz>(
    range: &DayRange,
    count: usize,
    recent: &[Violation],
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut output = String::new();
    let _ = writeln!(output, "Focus-mode violations on {}: {count}", range.day);
    for violation in recent {
        let _ = writeln!(
            output,
            "  {}  {} ({})",
            format_clock(violation.timestamp, tz),
            violation.app_name,
            violation.app_id
        );
    }
    if count > recent.len() {
        let _ = writeln!(output, "  ... and {} more", count - recent.len());
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, NaiveDate, Utc};
    use focus_core::AppId;
    use insta::assert_snapshot;

    fn range() -> DayRange {
        DayRange::in_timezone(NaiveDate::from_ymd_opt(2025, 1, 29).unwrap(), &Utc).unwrap()
    }

    fn violation(minute: i64, app_id: &str, name: &str) -> Violation {
        Violation {
            timestamp: Utc.with_ymd_and_hms(2025, 1, 29, 14, 0, 0).unwrap()
                + Duration::minutes(minute),
            app_id: AppId::new(app_id).unwrap(),
            app_name: name.to_string(),
        }
    }

    #[test]
    fn format_lists_recent_and_remainder() {
        let recent = vec![
            violation(42, "com.hnc.Discord", "Discord"),
            violation(17, "com.spotify.client", "Spotify"),
        ];
        assert_snapshot!(format_violations(&range(), 5, &recent, &Utc), @r"
Focus-mode violations on 2025-01-29: 5
  14:42:00  Discord (com.hnc.Discord)
  14:17:00  Spotify (com.spotify.client)
  ... and 3 more
");
    }

    #[test]
    fn run_reads_from_the_store() {
        let mut db = Database::open_in_memory().unwrap();
        for minute in [5, 10, 15] {
            db.record_violation(&violation(minute, "com.apple.mail", "Mail"))
                .unwrap();
        }

        let mut out = Vec::new();
        let count = run(&mut out, &db, &range(), 1, false).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert_eq!(count, 3);
        assert!(output.starts_with("Focus mode is disabled.\nFocus-mode violations on 2025-01-29: 3\n"));
        assert!(output.ends_with("  ... and 2 more\n"));
    }
}
