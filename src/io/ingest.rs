//! CSV ingest of daily temperature rows.
//!
//! Turns `date,max_temperature,min_temperature` rows into `DailyRecord`s.
//!
//! - **Strict header**: all three columns must be present, otherwise the
//!   source is treated as malformed and the whole load fails.
//! - **Lenient rows**: a row with an unusable date is skipped; a temperature
//!   that does not parse becomes `NaN`. Neither fails the load; both are
//!   recorded as `RowIssue`s and logged.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::data::DataSource;
use crate::domain::DailyRecord;
use crate::error::AppError;

pub const COL_DATE: &str = "date";
pub const COL_MAX: &str = "max_temperature";
pub const COL_MIN: &str = "min_temperature";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// What went wrong with a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// The CSV reader could not decode the row. The row is skipped.
    Unreadable(String),
    /// Missing or invalid `YYYY-MM-DD` date. The row is skipped.
    InvalidDate(String),
    /// A temperature did not parse and was kept as `NaN`.
    NonNumeric { column: &'static str, value: String },
}

impl IssueKind {
    /// Whether the row was dropped (as opposed to kept with a `NaN`).
    pub fn skips_row(&self) -> bool {
        !matches!(self, IssueKind::NonNumeric { .. })
    }
}

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    /// 1-based line in the CSV (the header is line 1).
    pub line: usize,
    pub kind: IssueKind,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Unreadable(e) => write!(f, "line {}: unreadable row ({e})", self.line),
            IssueKind::InvalidDate(v) => write!(f, "line {}: invalid date '{v}', row skipped", self.line),
            IssueKind::NonNumeric { column, value } => {
                write!(f, "line {}: `{column}` value '{value}' is not a number", self.line)
            }
        }
    }
}

/// Ingest output: parsed records plus what happened to the rest.
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub records: Vec<DailyRecord>,
    pub issues: Vec<RowIssue>,
    pub rows_read: usize,
}

impl IngestedData {
    /// Rows dropped because they could not be turned into a record.
    pub fn skipped_rows(&self) -> usize {
        self.issues.iter().filter(|i| i.kind.skips_row()).count()
    }

    /// Kept rows with at least one temperature coerced to `NaN`.
    pub fn coerced_rows(&self) -> usize {
        let mut lines: Vec<usize> = self
            .issues
            .iter()
            .filter(|i| !i.kind.skips_row())
            .map(|i| i.line)
            .collect();
        lines.dedup();
        lines.len()
    }
}

/// Fetch `source` and parse it as daily temperature CSV.
pub fn load_daily_records(source: &DataSource) -> Result<IngestedData, AppError> {
    let bytes = source.fetch()?;
    let data = parse_daily_csv(bytes.as_slice())?;
    info!(
        source = %source,
        rows = data.rows_read,
        records = data.records.len(),
        "parsed daily records"
    );
    Ok(data)
}

/// Parse daily temperature CSV from any reader.
pub fn parse_daily_csv<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data_unavailable(format!("failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut out = IngestedData::default();

    for (idx, result) in reader.records().enumerate() {
        out.rows_read += 1;
        // Blank lines and quoted newlines shift rows, so prefer the reader's position.
        let fallback_line = idx + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line() as usize);
                out.issues.push(RowIssue {
                    line,
                    kind: IssueKind::Unreadable(e.to_string()),
                });
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, |p| p.line() as usize);

        match parse_row(&record, &header_map) {
            Ok((daily, coerced)) => {
                out.records.push(daily);
                out.issues.extend(coerced.into_iter().map(|kind| RowIssue { line, kind }));
            }
            Err(kind) => out.issues.push(RowIssue { line, kind }),
        }
    }

    for issue in &out.issues {
        debug!(%issue, "row issue");
    }
    if !out.issues.is_empty() {
        warn!(
            skipped = out.skipped_rows(),
            coerced = out.coerced_rows(),
            "some rows were skipped or had non-numeric temperatures (kept as NaN)"
        );
    }

    Ok(out)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for column in [COL_DATE, COL_MAX, COL_MIN] {
        if !header_map.contains_key(column) {
            return Err(AppError::data_unavailable(format!(
                "missing required column `{column}`"
            )));
        }
    }
    Ok(())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<(DailyRecord, Vec<IssueKind>), IssueKind> {
    let raw_date = get_field(record, header_map, COL_DATE);
    let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
        .map_err(|_| IssueKind::InvalidDate(raw_date.to_string()))?;

    let mut coerced = Vec::new();
    let mut temperature = |column: &'static str| {
        let raw = get_field(record, header_map, column);
        parse_temperature(raw).unwrap_or_else(|| {
            coerced.push(IssueKind::NonNumeric {
                column,
                value: raw.to_string(),
            });
            f64::NAN
        })
    };

    let max = temperature(COL_MAX);
    let min = temperature(COL_MIN);

    Ok((DailyRecord::new(date, max, min), coerced))
}

/// Field value by column name; a short row reads as empty.
fn get_field<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> &'a str {
    header_map
        .get(name)
        .and_then(|idx| record.get(*idx))
        .map(str::trim)
        .unwrap_or("")
}

/// A finite number, or `None` (`inf` and `NaN` spellings are rejected too).
fn parse_temperature(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> IngestedData {
        parse_daily_csv(text.as_bytes()).unwrap()
    }

    #[test]
    fn well_formed_rows_become_records() {
        let data = parse(
            "date,max_temperature,min_temperature\n\
             2010-01-01,5.0,-1.0\n\
             2010-01-02,7,0\n",
        );
        assert_eq!(data.rows_read, 2);
        assert!(data.issues.is_empty());
        assert_eq!(
            data.records[0],
            DailyRecord::new(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(), 5.0, -1.0)
        );
        assert_eq!(data.records[1].max, 7.0);
    }

    #[test]
    fn headers_are_case_insensitive_and_bom_tolerant() {
        let data = parse(
            "\u{feff}Date, Min_Temperature ,MAX_TEMPERATURE,station\n\
             2014-05-06,21.5,28.0,HKO\n",
        );
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].max, 28.0);
        assert_eq!(data.records[0].min, 21.5);
    }

    #[test]
    fn missing_column_fails_the_load() {
        let err = parse_daily_csv("date,max_temperature\n2010-01-01,5\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
        assert_eq!(err.message(), crate::error::LOAD_FAILURE_MESSAGE);
    }

    #[test]
    fn bad_numbers_become_nan_and_are_reported() {
        let data = parse(
            "date,max_temperature,min_temperature\n\
             2010-02-01,abc,3.5\n\
             2010-02-02,,\n\
             2010-02-03,9.0,4.0\n",
        );
        assert_eq!(data.records.len(), 3);
        assert!(data.records[0].max.is_nan());
        assert_eq!(data.records[0].min, 3.5);
        assert!(data.records[1].max.is_nan());
        assert!(data.records[1].min.is_nan());

        assert_eq!(data.issues.len(), 3);
        assert_eq!(
            data.issues[0],
            RowIssue {
                line: 2,
                kind: IssueKind::NonNumeric {
                    column: COL_MAX,
                    value: "abc".to_string()
                }
            }
        );
        assert_eq!(data.coerced_rows(), 2);
        assert_eq!(data.skipped_rows(), 0);
    }

    #[test]
    fn invalid_dates_skip_the_row() {
        let data = parse(
            "date,max_temperature,min_temperature\n\
             2010-02-30,10,5\n\
             02/03/2010,10,5\n\
             2010-03-01,11,6\n",
        );
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.skipped_rows(), 2);
        assert_eq!(data.issues[0].line, 2);
        assert_eq!(data.issues[1].kind, IssueKind::InvalidDate("02/03/2010".to_string()));
    }

    #[test]
    fn issue_lines_count_blank_lines() {
        let data = parse(
            "date,max_temperature,min_temperature\n\
             \n\
             2010-03-01,11,6\n\
             \n\
             2010-03-02,oops,6\n",
        );
        assert_eq!(data.rows_read, 2);
        assert_eq!(data.issues.len(), 1);
        assert_eq!(data.issues[0].line, 5);
    }

    #[test]
    fn infinite_readings_are_reported_as_non_numeric() {
        let data = parse(
            "date,max_temperature,min_temperature\n\
             2010-04-01,inf,-infinity\n",
        );
        assert_eq!(data.records.len(), 1);
        assert!(data.records[0].max.is_nan());
        assert!(data.records[0].min.is_nan());
        assert_eq!(data.coerced_rows(), 1);
        assert_eq!(
            data.issues[1].kind,
            IssueKind::NonNumeric {
                column: COL_MIN,
                value: "-infinity".to_string()
            }
        );
    }

    #[test]
    fn header_only_file_yields_no_records() {
        let data = parse("date,max_temperature,min_temperature\n");
        assert_eq!(data.rows_read, 0);
        assert!(data.records.is_empty());
    }

    #[test]
    fn loads_from_a_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temperature_daily.csv");
        std::fs::write(&path, "date,max_temperature,min_temperature\n2017-12-31,16.2,11.0\n").unwrap();

        let data = load_daily_records(&DataSource::File(path)).unwrap();
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].min, 11.0);
    }
}
