//! Export the matrix to CSV.
//!
//! One row per bucket in grid order, easy to consume in spreadsheets or
//! downstream scripts. Statistics a month does not have are left empty.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::MatrixSnapshot;
use crate::error::AppError;

/// Write the matrix to a CSV file.
pub fn write_matrix_csv(path: &Path, snapshot: &MatrixSnapshot) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::render_failed(format!("failed to create export CSV '{}': {e}", path.display()))
    })?;
    write_matrix_csv_to(&mut file, snapshot)?;
    info!(path = %path.display(), buckets = snapshot.buckets.len(), "wrote matrix CSV");
    Ok(())
}

pub fn write_matrix_csv_to<W: Write>(out: &mut W, snapshot: &MatrixSnapshot) -> Result<(), AppError> {
    writeln!(
        out,
        "year,month,has_data,days,first_date,last_date,mean_max,mean_min,month_max,month_min"
    )
    .map_err(|e| AppError::render_failed(format!("failed to write export CSV header: {e}")))?;

    for bucket in &snapshot.buckets {
        let (first, last) = bucket
            .date_span()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .unwrap_or_default();
        let stat = |pick: fn(&crate::domain::MonthSummary) -> Option<f64>| {
            bucket
                .summary
                .as_ref()
                .and_then(pick)
                .map(|v| format!("{v:.4}"))
                .unwrap_or_default()
        };

        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{}",
            bucket.year,
            bucket.month,
            bucket.has_data,
            bucket.days.len(),
            first,
            last,
            stat(|s| s.mean_max),
            stat(|s| s.mean_min),
            stat(|s| s.month_max),
            stat(|s| s.month_min),
        )
        .map_err(|e| AppError::render_failed(format!("failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
