//! Day-level pipeline: rebuild sessions, compute metrics, render the summary.

use chrono::NaiveDate;
use thiserror::Error;

use crate::category::Categorizer;
use crate::metrics::{DailyMetrics, compute_metrics};
use crate::session::Session;
use crate::sessionizer::{SessionizerConfig, sessionize};
use crate::store::{DayRange, EventStore, SessionStore};
use crate::summary::render_summary;

/// A storage failure, tagged with the pipeline step that hit it.
#[derive(Debug, Error)]
pub enum PipelineError<E: std::error::Error + 'static> {
    #[error("failed to load events for {day}")]
    LoadEvents {
        day: NaiveDate,
        #[source]
        source: E,
    },
    #[error("failed to replace sessions for {day}")]
    ReplaceSessions {
        day: NaiveDate,
        #[source]
        source: E,
    },
    #[error("failed to load sessions for {day}")]
    LoadSessions {
        day: NaiveDate,
        #[source]
        source: E,
    },
}

impl<E: std::error::Error + 'static> PipelineError<E> {
    pub const fn day(&self) -> NaiveDate {
        match self {
            Self::LoadEvents { day, .. }
            | Self::ReplaceSessions { day, .. }
            | Self::LoadSessions { day, .. } => *day,
        }
    }

    /// Discards the step context and returns the store error.
    pub fn into_source(self) -> E {
        match self {
            Self::LoadEvents { source, .. }
            | Self::ReplaceSessions { source, .. }
            | Self::LoadSessions { source, .. } => source,
        }
    }
}

/// Replaces the day's sessions with a fresh segmentation of its events.
///
/// Deletion and insertion go through [`SessionStore::replace_sessions`], so a
/// failure leaves the previous sessions in place and the call can be retried.
pub fn rebuild_sessions<S, E>(
    store: &mut S,
    range: &DayRange,
    config: &SessionizerConfig,
) -> Result<Vec<Session>, PipelineError<E>>
where
    S: EventStore<Error = E> + SessionStore<Error = E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let day = range.day;
    let events = store
        .fetch_events(range.start, range.end)
        .map_err(|source| PipelineError::LoadEvents { day, source })?;

    let sessions = sessionize(&events, config);

    store
        .replace_sessions(range.start, range.end, &sessions)
        .map_err(|source| PipelineError::ReplaceSessions { day, source })?;

    tracing::debug!(
        %day,
        event_count = events.len(),
        session_count = sessions.len(),
        "rebuilt sessions"
    );
    Ok(sessions)
}

/// Computes metrics from the sessions currently stored for the day.
pub fn metrics_for_day<S, E>(
    store: &S,
    range: &DayRange,
    categorizer: &Categorizer,
) -> Result<DailyMetrics, PipelineError<E>>
where
    S: SessionStore<Error = E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let sessions = store
        .fetch_sessions(range.start, range.end)
        .map_err(|source| PipelineError::LoadSessions {
            day: range.day,
            source,
        })?;
    Ok(compute_metrics(&sessions, categorizer))
}

/// Rebuilds the day's sessions and renders its summary text.
pub fn daily_summary<S, E>(
    store: &mut S,
    range: &DayRange,
    config: &SessionizerConfig,
    categorizer: &Categorizer,
) -> Result<String, PipelineError<E>>
where
    S: EventStore<Error = E> + SessionStore<Error = E>,
    E: std::error::Error + Send + Sync + 'static,
{
    rebuild_sessions(store, range, config)?;
    let metrics = metrics_for_day(&*store, range, categorizer)?;
    Ok(render_summary(range.day, &metrics))
}
