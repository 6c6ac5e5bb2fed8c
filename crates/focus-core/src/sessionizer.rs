//! Segmentation of a day's samples into sessions.
//!
//! # Algorithm Summary
//!
//! Walk the events in timestamp order keeping one open segment. A segment is
//! closed when the next sample belongs to another application, is idle, or
//! arrives more than `max_gap` after the previous one. Closed segments shorter
//! than `min_session` are discarded.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::session::Session;
use crate::types::AppId;

/// Thresholds for session segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionizerConfig {
    /// Largest gap between consecutive samples that keeps a session open.
    /// Default: 10 seconds.
    pub max_gap_secs: i64,

    /// Shortest session worth keeping.
    /// Default: 10 seconds.
    pub min_session_secs: i64,
}

impl Default for SessionizerConfig {
    fn default() -> Self {
        Self {
            max_gap_secs: 10,
            min_session_secs: 10,
        }
    }
}

impl SessionizerConfig {
    fn max_gap(&self) -> Duration {
        Duration::seconds(self.max_gap_secs)
    }

    fn min_session(&self) -> Duration {
        Duration::seconds(self.min_session_secs)
    }
}

/// The segment currently being accumulated.
#[derive(Debug)]
struct OpenSegment {
    start: DateTime<Utc>,
    app_id: AppId,
    app_name: String,
    window_title: Option<String>,
    /// Whether the sample that opened this segment was idle.
    opened_by_idle: bool,
}

impl OpenSegment {
    fn open(event: &Event) -> Self {
        Self {
            start: event.timestamp,
            app_id: event.app_id.clone(),
            app_name: event.app_name.clone(),
            window_title: usable_title(event),
            opened_by_idle: event.is_idle,
        }
    }

    fn observe(&mut self, event: &Event) {
        if self.window_title.is_none() {
            self.window_title = usable_title(event);
        }
    }

    fn close(
        self,
        end: DateTime<Utc>,
        ended_by_idle: bool,
        config: &SessionizerConfig,
    ) -> Option<Session> {
        if end - self.start < config.min_session() {
            return None;
        }
        Some(
            Session::new(self.start, end, self.app_id, self.app_name, ended_by_idle)
                .with_title(self.window_title),
        )
    }
}

fn usable_title(event: &Event) -> Option<String> {
    event
        .window_title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
}

/// Splits events into sessions.
///
/// Events must be sorted by timestamp ascending. The output is ordered by
/// start time, non-overlapping, and every session lasts at least
/// `min_session_secs`. The function is deterministic, so repeated calls on the
/// same events produce identical sessions.
pub fn sessionize(events: &[Event], config: &SessionizerConfig) -> Vec<Session> {
    let Some((first, rest)) = events.split_first() else {
        return Vec::new();
    };

    let mut sessions = Vec::new();
    let mut dropped = 0usize;
    let mut current = OpenSegment::open(first);
    let mut last_ts = first.timestamp;

    for event in rest {
        let gap = event.timestamp - last_ts;
        let gap_exceeded = gap > config.max_gap();
        let should_break = event.app_id != current.app_id || event.is_idle || gap_exceeded;

        if should_break {
            let next = OpenSegment::open(event);
            let closing = std::mem::replace(&mut current, next);
            match closing.close(last_ts, event.is_idle || gap_exceeded, config) {
                Some(session) => sessions.push(session),
                None => dropped += 1,
            }
        } else {
            current.observe(event);
        }

        last_ts = event.timestamp;
    }

    let ended_by_idle = current.opened_by_idle;
    match current.close(last_ts, ended_by_idle, config) {
        Some(session) => sessions.push(session),
        None => dropped += 1,
    }

    tracing::debug!(
        event_count = events.len(),
        session_count = sessions.len(),
        dropped_segments = dropped,
        "sessionized events"
    );
    if sessions.is_empty() && dropped > 1 {
        tracing::warn!(
            dropped_segments = dropped,
            min_session_secs = config.min_session_secs,
            "every segment was shorter than the minimum session"
        );
    }

    sessions
}
