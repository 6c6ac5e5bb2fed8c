//! CLI subcommand implementations.

pub mod ingest;
pub mod metrics;
pub mod rebuild;
pub mod summary;
pub mod util;
pub mod violations;
