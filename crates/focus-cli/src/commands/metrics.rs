//! Metrics command: rebuilds a day and prints its aggregate figures.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use focus_core::{
    Categorizer, DailyMetrics, DayRange, SessionizerConfig, metrics_for_day, rebuild_sessions,
};
use focus_db::Database;
use serde::Serialize;

use super::util::format_minutes;

/// JSON output shape.
#[derive(Debug, Serialize)]
struct MetricsReport<'a> {
    date: NaiveDate,
    #[serde(flatten)]
    metrics: &'a DailyMetrics,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    range: &DayRange,
    config: &SessionizerConfig,
    categorizer: &Categorizer,
    json: bool,
) -> Result<DailyMetrics> {
    rebuild_sessions(db, range, config)?;
    let metrics = metrics_for_day(&*db, range, categorizer)?;

    if json {
        writeln!(writer, "{}", format_metrics_json(range.day, &metrics)?)?;
    } else {
        write!(writer, "{}", format_metrics(range.day, &metrics))?;
    }
    Ok(metrics)
}

pub fn format_metrics_json(day: NaiveDate, metrics: &DailyMetrics) -> Result<String> {
    let report = MetricsReport {
        date: day,
        metrics,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn format_metrics(day: NaiveDate, metrics: &DailyMetrics) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "FOCUS METRICS: {day}");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Active time:       {}",
        format_minutes(metrics.total_active_minutes)
    );
    let _ = writeln!(
        output,
        "Longest focus:     {}",
        format_minutes(metrics.longest_focus_minutes)
    );
    let _ = writeln!(output, "Context switches:  {}", metrics.context_switches);
    let _ = writeln!(output);
    let _ = writeln!(output, "BY CATEGORY");
    let _ = writeln!(
        output,
        "  Deep work:       {}",
        format_minutes(metrics.deep_work_minutes)
    );
    let _ = writeln!(
        output,
        "  Shallow work:    {}",
        format_minutes(metrics.shallow_work_minutes)
    );
    let _ = writeln!(
        output,
        "  Distraction:     {}",
        format_minutes(metrics.distraction_minutes)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "TOP APPS");
    if metrics.top_apps.is_empty() {
        let _ = writeln!(output, "  (no sessions)");
    }
    for app in &metrics.top_apps {
        let _ = writeln!(output, "  {:<24}{}", app.app_name, format_minutes(app.minutes));
    }
    output
}
