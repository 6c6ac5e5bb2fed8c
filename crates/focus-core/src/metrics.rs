//! Daily aggregate metrics over a day's sessions.
//!
//! All minute figures are sums of per-session floored minutes. A day with two
//! 90-second sessions therefore reports 2 active minutes, not 3.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::category::{Categorizer, Category};
use crate::session::Session;

/// Number of applications reported in [`DailyMetrics::top_apps`].
pub const TOP_APPS_LIMIT: usize = 5;

/// Minutes attributed to one application display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMinutes {
    pub app_name: String,
    pub minutes: i64,
}

/// Aggregate productivity figures for one day.
///
/// Recomputed on demand from sessions; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub total_active_minutes: i64,
    pub context_switches: usize,
    pub longest_focus_minutes: i64,
    /// Up to five applications, descending by minutes. Ties have no
    /// guaranteed order.
    pub top_apps: Vec<AppMinutes>,
    pub deep_work_minutes: i64,
    pub shallow_work_minutes: i64,
    pub distraction_minutes: i64,
}

/// Computes metrics for sessions sorted by start time.
pub fn compute_metrics(sessions: &[Session], categorizer: &Categorizer) -> DailyMetrics {
    let mut metrics = DailyMetrics {
        context_switches: count_context_switches(sessions),
        ..DailyMetrics::default()
    };

    // Insertion order of first appearance, used only to make the ranking
    // deterministic.
    let mut by_app: HashMap<&str, (usize, i64)> = HashMap::new();

    for session in sessions {
        let minutes = session.minutes();
        metrics.total_active_minutes += minutes;
        metrics.longest_focus_minutes = metrics.longest_focus_minutes.max(minutes);

        let next_rank = by_app.len();
        by_app.entry(session.app_name.as_str()).or_insert((next_rank, 0)).1 += minutes;

        let category =
            categorizer.categorize(session.app_id.as_str(), session.window_title.as_deref());
        match category {
            Category::DeepWork => metrics.deep_work_minutes += minutes,
            Category::ShallowWork => metrics.shallow_work_minutes += minutes,
            Category::Distraction => metrics.distraction_minutes += minutes,
            Category::Unknown => {}
        }
    }

    let mut ranked: Vec<(&str, usize, i64)> = by_app
        .into_iter()
        .map(|(name, (first_seen, minutes))| (name, first_seen, minutes))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));

    metrics.top_apps = ranked
        .into_iter()
        .take(TOP_APPS_LIMIT)
        .map(|(name, _, minutes)| AppMinutes {
            app_name: name.to_string(),
            minutes,
        })
        .collect();

    tracing::debug!(
        session_count = sessions.len(),
        total_active_minutes = metrics.total_active_minutes,
        context_switches = metrics.context_switches,
        "computed daily metrics"
    );

    metrics
}

/// Counts adjacent session pairs whose application identifiers differ.
pub fn count_context_switches(sessions: &[Session]) -> usize {
    sessions
        .windows(2)
        .filter(|pair| pair[0].app_id != pair[1].app_id)
        .count()
}
