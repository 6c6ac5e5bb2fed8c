//! Shared utilities for CLI commands.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use focus_core::DayRange;

/// Resolves `--date` to a local day, defaulting to today.
pub fn resolve_day(date: Option<NaiveDate>) -> anyhow::Result<DayRange> {
    let day = date.unwrap_or_else(|| Local::now().date_naive());
    Ok(DayRange::local(day)?)
}

/// Formats whole minutes as `"1h 5m"` or `"25m"`.
pub fn format_minutes(minutes: i64) -> String {
    if minutes < 0 {
        return "0m".to_string();
    }
    let hours = minutes / 60;
    let minutes = minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Formats an instant as wall-clock time in `tz`.
pub fn format_clock<Tz>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn format_minutes_splits_hours() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(25), "25m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(125), "2h 5m");
        assert_eq!(format_minutes(-3), "0m");
    }

    #[test]
    fn format_clock_uses_the_given_timezone() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 29, 18, 5, 9).unwrap();
        assert_eq!(format_clock(instant, &Utc), "18:05:09");

        let pst = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(format_clock(instant, &pst), "10:05:09");
    }

    #[test]
    fn explicit_date_is_kept() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        assert_eq!(resolve_day(Some(day)).unwrap().day, day);
    }

    #[test]
    fn last_representable_date_is_an_error() {
        let err = resolve_day(Some(NaiveDate::MAX)).unwrap_err();
        assert_eq!(err.to_string(), format!("date out of range: {}", NaiveDate::MAX));
    }
}
