//! Formatted terminal output: run summary, text matrix, and cell captions.
//!
//! We keep formatting code in one place so output changes stay localized and
//! the aggregation code stays free of presentation concerns.

use chrono::Month;

use crate::domain::{MatrixSnapshot, MonthBucket, ViewMode};
use crate::io::ingest::IngestedData;

/// Issues listed individually before the rest are summarized.
const MAX_LISTED_ISSUES: usize = 10;

/// Full English month name for 1-12, `"?"` otherwise.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("?")
}

/// Tooltip text for one cell.
///
/// Populated months show their extreme max and min; empty months say so on a
/// second line.
pub fn cell_caption(bucket: &MonthBucket) -> String {
    let Some(summary) = bucket.summary.filter(|_| bucket.has_data) else {
        return format!("Date: {}\nNo data available", bucket.label());
    };
    format!(
        "Date: {}, max: {} min: {}",
        bucket.label(),
        fmt_temp(summary.month_max),
        fmt_temp(summary.month_min)
    )
}

/// Dataset and grid overview printed by `tmx summary`.
pub fn format_run_summary(
    source: &str,
    ingest: &IngestedData,
    snapshot: &MatrixSnapshot,
    view: ViewMode,
) -> String {
    let mut out = String::new();

    out.push_str("=== tmx - daily temperature matrix ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: read={} | records={} | skipped={} | with NaN={}\n",
        ingest.rows_read,
        ingest.records.len(),
        ingest.skipped_rows(),
        ingest.coerced_rows(),
    ));
    out.push_str(&format!(
        "Years: {}-{} | months with data: {}/{}\n",
        snapshot.range.first(),
        snapshot.range.last(),
        snapshot.populated_months(),
        snapshot.buckets.len(),
    ));
    out.push_str(&format!("View: {}\n", view.display_name()));

    if !ingest.issues.is_empty() {
        out.push_str("\nRow issues:\n");
        for issue in ingest.issues.iter().take(MAX_LISTED_ISSUES) {
            out.push_str(&format!("- {issue}\n"));
        }
        let rest = ingest.issues.len().saturating_sub(MAX_LISTED_ISSUES);
        if rest > 0 {
            out.push_str(&format!("- ... and {rest} more\n"));
        }
    }
    out.push('\n');

    out
}

/// Months as rows, years as columns, one value per cell (`--` when missing).
pub fn format_matrix(snapshot: &MatrixSnapshot, view: ViewMode) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<10}", "°C"));
    for year in &snapshot.years {
        out.push_str(&format!("{year:>7}"));
    }
    out.push('\n');

    for month in 1..=12u32 {
        out.push_str(&format!("{:<10}", month_name(month)));
        for &year in &snapshot.years {
            let value = snapshot
                .bucket(year, month)
                .and_then(|b| b.summary.as_ref())
                .and_then(|s| view.value(s));
            match value {
                Some(v) => out.push_str(&format!("{v:>7.1}")),
                None => out.push_str(&format!("{:>7}", "--")),
            }
        }
        out.push('\n');
    }

    out
}

fn fmt_temp(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "n/a".to_string(),
    }
}
