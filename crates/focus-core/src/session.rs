//! Derived usage sessions.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::AppId;

/// A contiguous run of samples attributed to one application.
///
/// Sessions are owned by the sessionizer: a day's sessions are always deleted
/// and rebuilt together, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Deterministic identifier derived from the application and start time.
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub app_id: AppId,
    pub app_name: String,
    /// Whole seconds between start and end, truncated.
    pub duration_secs: i64,
    /// True when the session was closed by an idle sample or a sampling gap.
    pub ended_by_idle: bool,
    /// First non-empty window title seen during the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_title: Option<String>,
}

impl Session {
    /// Builds a session spanning `start..=end`.
    pub fn new(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        app_id: AppId,
        app_name: impl Into<String>,
        ended_by_idle: bool,
    ) -> Self {
        Self {
            id: deterministic_session_id(&app_id, start_time),
            start_time,
            end_time,
            duration_secs: (end_time - start_time).num_seconds(),
            app_id,
            app_name: app_name.into(),
            ended_by_idle,
            window_title: None,
        }
    }

    /// Attaches the window title observed during the session.
    #[must_use]
    pub fn with_title(mut self, window_title: Option<String>) -> Self {
        self.window_title = window_title;
        self
    }

    /// Duration floored to whole minutes.
    pub const fn minutes(&self) -> i64 {
        self.duration_secs / 60
    }
}

fn deterministic_session_id(app_id: &AppId, start_time: DateTime<Utc>) -> String {
    let start = start_time.to_rfc3339_opts(SecondsFormat::Millis, true);
    let content = format!("session|{app_id}|{start}");
    Uuid::new_v5(&Uuid::NAMESPACE_OID, content.as_bytes()).to_string()
}
