//! Read/write matrix JSON files.
//!
//! A snapshot file is the portable form of one aggregation run, so a heatmap
//! can be re-rendered later without the original CSV.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{MatrixSnapshot, ViewMode};
use crate::error::AppError;

const TOOL: &str = "tmx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub tool: String,
    /// View that was active when the file was written.
    pub view: ViewMode,
    pub matrix: MatrixSnapshot,
}

pub fn write_snapshot_json(path: &Path, snapshot: &MatrixSnapshot, view: ViewMode) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::render_failed(format!("failed to create snapshot JSON '{}': {e}", path.display()))
    })?;

    let doc = SnapshotFile {
        tool: TOOL.to_string(),
        view,
        matrix: snapshot.clone(),
    };
    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::render_failed(format!("failed to write snapshot JSON: {e}")))?;

    info!(path = %path.display(), "wrote matrix snapshot");
    Ok(())
}

/// Read a snapshot file and check that its grid is dense and ordered.
pub fn read_snapshot_json(path: &Path) -> Result<SnapshotFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::data_unavailable(format!("failed to open snapshot JSON '{}': {e}", path.display()))
    })?;
    let doc: SnapshotFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::data_unavailable(format!("invalid snapshot JSON: {e}")))?;

    doc.matrix
        .validate()
        .map_err(|e| AppError::data_unavailable(format!("snapshot grid is not dense: {e}")))?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::domain::{DailyRecord, YearRange};
    use chrono::NaiveDate;

    #[test]
    fn saved_snapshot_reloads_with_nan_readings() {
        let records = [
            DailyRecord::new(NaiveDate::from_ymd_opt(2013, 9, 1).unwrap(), 30.1, f64::NAN),
            DailyRecord::new(NaiveDate::from_ymd_opt(2013, 9, 2).unwrap(), 29.4, 25.0),
        ];
        let snapshot = aggregate(&records, YearRange::new(2013, 2014).unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        write_snapshot_json(&path, &snapshot, ViewMode::Min).unwrap();

        let doc = read_snapshot_json(&path).unwrap();
        assert_eq!(doc.view, ViewMode::Min);
        assert_eq!(doc.matrix.buckets.len(), 24);
        let sep = doc.matrix.bucket(2013, 9).unwrap();
        assert!(sep.days[0].min.is_nan());
        let got = sep.summary.unwrap();
        let want = snapshot.bucket(2013, 9).unwrap().summary.unwrap();
        assert!((got.mean_max.unwrap() - want.mean_max.unwrap()).abs() < 1e-9);
        assert_eq!(got.month_min, Some(25.0));
    }

    #[test]
    fn sparse_grid_is_rejected() {
        let mut snapshot = aggregate(&[], YearRange::new(2010, 2010).unwrap());
        snapshot.buckets.pop();
        let doc = SnapshotFile {
            tool: TOOL.to_string(),
            view: ViewMode::Max,
            matrix: snapshot,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let err = read_snapshot_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        std::fs::write(
            &path,
            r#"{"tool":"tmx","view":"max","matrix":{"range":{"first":2010,"last":2009},"years":[],"buckets":[]}}"#,
        )
        .unwrap();

        let err = read_snapshot_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }

    #[test]
    fn day_outside_its_month_is_rejected() {
        let records = [DailyRecord::new(NaiveDate::from_ymd_opt(2010, 1, 5).unwrap(), 5.0, 1.0)];
        let mut snapshot = aggregate(&records, YearRange::new(2010, 2010).unwrap());
        snapshot.buckets[0].days[0].date = NaiveDate::from_ymd_opt(2010, 3, 5).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        write_snapshot_json(&path, &snapshot, ViewMode::Max).unwrap();

        let err = read_snapshot_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }
}
