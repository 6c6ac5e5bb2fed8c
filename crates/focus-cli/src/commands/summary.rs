//! Summary command: runs the whole pipeline and prints the daily summary.

use std::io::Write;

use anyhow::Result;
use focus_core::{Categorizer, DayRange, SessionizerConfig, daily_summary};
use focus_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    range: &DayRange,
    config: &SessionizerConfig,
    categorizer: &Categorizer,
) -> Result<()> {
    let text = daily_summary(db, range, config, categorizer)?;
    writeln!(writer, "{text}")?;
    Ok(())
}
