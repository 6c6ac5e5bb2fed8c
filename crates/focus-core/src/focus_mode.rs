//! Focus mode: a block list of applications that count as violations while
//! focus mode is on.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::types::AppId;

/// Focus mode settings, loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusModeConfig {
    pub enabled: bool,
    pub blocked_apps: Vec<String>,
}

impl Default for FocusModeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            blocked_apps: [
                "com.apple.MobileSMS",
                "com.spotify.client",
                "com.hnc.Discord",
                "com.tinyspeck.slackmacgap",
                "com.apple.mail",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// A sample of a blocked application taken while focus mode was on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub timestamp: DateTime<Utc>,
    pub app_id: AppId,
    pub app_name: String,
}

/// Decides which samples violate focus mode.
#[derive(Debug, Clone, Default)]
pub struct FocusMode {
    enabled: bool,
    blocked: HashSet<String>,
}

impl FocusMode {
    pub fn new(config: &FocusModeConfig) -> Self {
        Self {
            enabled: config.enabled,
            blocked: config.blocked_apps.iter().cloned().collect(),
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True only while focus mode is enabled and the application is listed.
    pub fn is_blocked(&self, app_id: &str) -> bool {
        self.enabled && self.blocked.contains(app_id)
    }

    /// Returns the violation represented by a sample, if any. Idle samples
    /// never violate.
    pub fn check(&self, event: &Event) -> Option<Violation> {
        if event.is_idle || !self.is_blocked(event.app_id.as_str()) {
            return None;
        }
        Some(Violation {
            timestamp: event.timestamp,
            app_id: event.app_id.clone(),
            app_name: event.app_name.clone(),
        })
    }
}
