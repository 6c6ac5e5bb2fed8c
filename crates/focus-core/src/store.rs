//! Storage contracts for events, sessions and focus-mode violations.
//!
//! The pipeline receives a store explicitly instead of reaching for a global.
//! Implementations must serialize access per logical operation: a session
//! rebuild has to read one consistent snapshot of events and must not
//! interleave with concurrent appends between its delete and insert.
//!
//! All ranges are half-open: inclusive of `start`, exclusive of `end`.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use thiserror::Error;

use crate::event::Event;
use crate::focus_mode::Violation;
use crate::session::Session;

/// Append-only storage for raw samples.
pub trait EventStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stores one sample.
    fn append(&mut self, event: &Event) -> Result<(), Self::Error>;

    /// Returns samples in `[start, end)` ordered by timestamp ascending.
    fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, Self::Error>;
}

/// Storage for derived sessions, selected by start time.
pub trait SessionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deletes sessions starting in `[start, end)`.
    fn delete_sessions(&mut self, start: DateTime<Utc>, end: DateTime<Utc>)
    -> Result<usize, Self::Error>;

    /// Stores one session.
    fn insert_session(&mut self, session: &Session) -> Result<(), Self::Error>;

    /// Returns sessions starting in `[start, end)` ordered by start time.
    fn fetch_sessions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, Self::Error>;

    /// Atomically replaces every session starting in `[start, end)`.
    ///
    /// On error the previous sessions must remain untouched.
    fn replace_sessions(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        sessions: &[Session],
    ) -> Result<(), Self::Error>;
}

/// Storage for focus-mode violations.
pub trait ViolationStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn record_violation(&mut self, violation: &Violation) -> Result<(), Self::Error>;

    /// Number of violations in `[start, end)`.
    fn violation_count(&self, start: DateTime<Utc>, end: DateTime<Utc>)
    -> Result<usize, Self::Error>;

    /// Most recent violations in `[start, end)`, newest first.
    fn violations(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Violation>, Self::Error>;
}

/// A day whose midnight boundaries fall outside the representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("date out of range: {0}")]
pub struct DayOutOfRange(pub NaiveDate);

/// A local calendar day expressed as a UTC half-open interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayRange {
    /// Midnight to midnight in the local timezone.
    pub fn local(day: NaiveDate) -> Result<Self, DayOutOfRange> {
        Self::in_timezone(day, &Local)
    }

    /// Midnight to midnight in an explicit timezone.
    pub fn in_timezone<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Result<Self, DayOutOfRange> {
        let next = day.succ_opt().ok_or(DayOutOfRange(day))?;
        Ok(Self {
            day,
            start: midnight_to_utc(day, tz).ok_or(DayOutOfRange(day))?,
            end: midnight_to_utc(next, tz).ok_or(DayOutOfRange(day))?,
        })
    }
}

/// Converts a date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
fn midnight_to_utc<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => {
            // DST spring-forward gap at midnight: 01:00 local exists instead
            let one_am = midnight.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&one_am)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}
