//! Rebuild command: re-derives one day's sessions from its samples.

use std::fmt::{Display, Write as _};
use std::io::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use focus_core::{DayRange, Session, SessionizerConfig, rebuild_sessions};
use focus_db::Database;

use super::util::{format_clock, format_minutes};

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    range: &DayRange,
    config: &SessionizerConfig,
) -> Result<Vec<Session>> {
    let sessions = rebuild_sessions(db, range, config)?;
    write!(writer, "{}", format_sessions(range, &sessions, &Local))?;
    Ok(sessions)
}

/// Renders one line per session in the given timezone.
pub fn format_sessions<Tz>(range: &DayRange, sessions: &[Session], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut output = format!("Sessions for {}: {}\n", range.day, sessions.len());
    for session in sessions {
        let idle = if session.ended_by_idle { "  (idle)" } else { "" };
        let _ = writeln!(
            output,
            "  {} - {}  {:>7}  {}{idle}",
            format_clock(session.start_time, tz),
            format_clock(session.end_time, tz),
            format_minutes(session.minutes()),
            session.app_name,
        );
    }
    output
}
