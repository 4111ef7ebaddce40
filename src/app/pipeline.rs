//! Shared load-and-aggregate pipeline used by every front-end.
//!
//! data source -> CSV parse -> year/month aggregation
//!
//! The CLI commands and the TUI only differ in how they present the result.

use tracing::info;

use crate::aggregate::aggregate;
use crate::domain::{MatrixConfig, MatrixSnapshot};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_daily_records};

/// Everything computed by one run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub snapshot: MatrixSnapshot,
}

/// Load the configured source and aggregate it into a dense matrix.
pub fn run_pipeline(config: &MatrixConfig) -> Result<RunOutput, AppError> {
    info!(source = %config.source, "loading daily records");
    let ingest = load_daily_records(&config.source)?;

    Ok(run_with_records(config, ingest))
}

/// Aggregate records that were already loaded.
pub fn run_with_records(config: &MatrixConfig, ingest: IngestedData) -> RunOutput {
    let snapshot = aggregate(&ingest.records, config.range);
    info!(
        first_year = config.range.first(),
        last_year = config.range.last(),
        populated = snapshot.populated_months(),
        cells = snapshot.buckets.len(),
        "aggregated matrix"
    );

    RunOutput { ingest, snapshot }
}
