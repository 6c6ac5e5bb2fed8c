//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Daily focus report.
///
/// Turns foreground-application samples into sessions, metrics and a
/// plain-text summary with suggestions for tomorrow.
#[derive(Debug, Parser)]
#[command(name = "focus", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Append JSON Lines samples from stdin.
    Ingest,

    /// Rebuild the sessions of one day and list them.
    Rebuild {
        /// Day to rebuild (YYYY-MM-DD, local). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Rebuild and print the metrics of one day.
    Metrics {
        /// Day to report (YYYY-MM-DD, local). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Rebuild and print the daily summary.
    Summary {
        /// Day to summarize (YYYY-MM-DD, local). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show focus-mode violations for one day.
    Violations {
        /// Day to inspect (YYYY-MM-DD, local). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Maximum number of violations to list.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}
