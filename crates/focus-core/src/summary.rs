//! Human-readable daily summary with heuristic recommendations.

use chrono::NaiveDate;

use crate::metrics::DailyMetrics;

/// Maximum number of recommendations included in a summary.
const MAX_RECOMMENDATIONS: usize = 3;

/// How well attention held up over the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusQuality {
    Strong,
    Decent,
    Fragmented,
}

impl FocusQuality {
    pub const fn from_longest_focus(minutes: i64) -> Self {
        if minutes >= 40 {
            Self::Strong
        } else if minutes >= 25 {
            Self::Decent
        } else {
            Self::Fragmented
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Decent => "decent",
            Self::Fragmented => "fragmented",
        }
    }
}

/// A heuristic suggestion for tomorrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    HighSwitching,
    ModerateSwitching,
    LowSwitching,
    ShortFocus,
    MediumFocus,
    LongFocus,
    LowActivity,
}

impl Recommendation {
    pub const fn text(&self) -> &'static str {
        match self {
            Self::HighSwitching => {
                "Your context switching was high. Try one 25-minute focus block with only one app open."
            }
            Self::ModerateSwitching => {
                "Try grouping similar tasks together to reduce app switching."
            }
            Self::LowSwitching => {
                "Nice job keeping context switching low. Try extending one focus block tomorrow."
            }
            Self::ShortFocus => {
                "Your longest focus block was under 20 minutes. Aim for a 25-minute uninterrupted session."
            }
            Self::MediumFocus => {
                "Try pushing your best focus block to 40 minutes by pausing notifications."
            }
            Self::LongFocus => "Great focus endurance today. Protect that time window tomorrow.",
            Self::LowActivity => {
                "You had low active time today. Try scheduling one dedicated study block tomorrow."
            }
        }
    }
}

/// Evaluates the heuristics in their fixed order and keeps the first three.
pub fn recommendations(metrics: &DailyMetrics) -> Vec<Recommendation> {
    let switching = match metrics.context_switches {
        60.. => Recommendation::HighSwitching,
        30.. => Recommendation::ModerateSwitching,
        _ => Recommendation::LowSwitching,
    };

    let focus = if metrics.longest_focus_minutes < 20 {
        Recommendation::ShortFocus
    } else if metrics.longest_focus_minutes < 40 {
        Recommendation::MediumFocus
    } else {
        Recommendation::LongFocus
    };

    let mut recs = vec![switching, focus];
    if metrics.total_active_minutes < 60 {
        recs.push(Recommendation::LowActivity);
    }
    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

/// Formats context switches per active hour, e.g. `"4.5/hr"`.
#[allow(clippy::cast_precision_loss)]
pub fn switch_rate(metrics: &DailyMetrics) -> String {
    if metrics.total_active_minutes <= 0 {
        return "0/hr".to_string();
    }
    let hours = metrics.total_active_minutes as f64 / 60.0;
    let rate = metrics.context_switches as f64 / hours.max(0.1);
    format!("{rate:.1}/hr")
}

fn top_apps_line(metrics: &DailyMetrics) -> String {
    if metrics.top_apps.is_empty() {
        return "No app usage recorded.".to_string();
    }
    metrics
        .top_apps
        .iter()
        .map(|app| format!("{} ({}m)", app.app_name, app.minutes))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders the daily summary text.
pub fn render_summary(day: NaiveDate, metrics: &DailyMetrics) -> String {
    let quality = FocusQuality::from_longest_focus(metrics.longest_focus_minutes);

    let mut lines = vec![
        format!("Daily Summary ({})", day.format("%b %-d")),
        String::new(),
        format!(
            "You were active for {} minutes.",
            metrics.total_active_minutes
        ),
        format!(
            "Longest focus block: {} minutes.",
            metrics.longest_focus_minutes
        ),
        format!(
            "Context switches: {} ({}). Focus quality: {}.",
            metrics.context_switches,
            switch_rate(metrics),
            quality.as_str()
        ),
        String::new(),
        "Top apps:".to_string(),
        top_apps_line(metrics),
        String::new(),
        "What to improve tomorrow:".to_string(),
    ];
    for (i, rec) in recommendations(metrics).iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, rec.text()));
    }

    lines.join("\n")
}
