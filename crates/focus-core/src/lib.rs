//! Core domain logic for focus.
//!
//! This crate turns foreground-application samples into a daily report:
//! - Sessionizer: segmenting samples into usage sessions
//! - Categorizer: classifying applications, optionally by window title
//! - Metrics: aggregating sessions into daily figures
//! - Summary: rendering the report with recommendations
//!
//! Storage is abstracted behind the traits in [`store`].

pub mod category;
pub mod event;
pub mod focus_mode;
pub mod metrics;
pub mod pipeline;
pub mod session;
pub mod sessionizer;
pub mod store;
pub mod summary;
mod types;

pub use category::{BaseMapping, Categorizer, Category, CategoryConfig, Classify, TitleRules};
pub use event::Event;
pub use focus_mode::{FocusMode, FocusModeConfig, Violation};
pub use metrics::{AppMinutes, DailyMetrics, compute_metrics};
pub use pipeline::{PipelineError, daily_summary, metrics_for_day, rebuild_sessions};
pub use session::Session;
pub use sessionizer::{SessionizerConfig, sessionize};
pub use store::{DayOutOfRange, DayRange, EventStore, SessionStore, ViolationStore};
pub use summary::{Recommendation, render_summary};
pub use types::{AppId, UNKNOWN_APP, ValidationError};
