//! Raw foreground-application samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AppId;

/// One sample of the foreground application, as produced by the sampler.
///
/// Events are immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// When the sample was taken.
    pub timestamp: DateTime<Utc>,
    /// Stable identifier of the foreground application.
    pub app_id: AppId,
    /// Human-readable application name.
    pub app_name: String,
    /// Whether the user was idle when the sample was taken.
    #[serde(default)]
    pub is_idle: bool,
    /// Title of the focused window, when the sampler could read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_title: Option<String>,
}

impl Event {
    /// Creates a non-idle sample without a window title.
    pub fn new(timestamp: DateTime<Utc>, app_id: AppId, app_name: impl Into<String>) -> Self {
        Self {
            timestamp,
            app_id,
            app_name: app_name.into(),
            is_idle: false,
            window_title: None,
        }
    }

    /// Marks the sample as idle.
    #[must_use]
    pub const fn idle(mut self) -> Self {
        self.is_idle = true;
        self
    }

    /// Attaches a window title. Blank titles are treated as absent.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.window_title = if title.trim().is_empty() {
            None
        } else {
            Some(title)
        };
        self
    }
}
