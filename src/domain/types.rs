//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once per load by the aggregator
//! - exported to JSON/CSV
//! - reloaded later for rendering

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::data::DataSource;
use crate::error::AppError;

/// Months per year; every year contributes exactly this many buckets.
pub const MONTHS_PER_YEAR: usize = 12;

/// First year of the default range.
pub const DEFAULT_FIRST_YEAR: i32 = 2008;
/// Last year (inclusive) of the default range.
pub const DEFAULT_LAST_YEAR: i32 = 2017;

/// One parsed input row.
///
/// Temperatures that failed to parse are `NaN`; statistics skip them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(with = "nan_as_null")]
    pub max: f64,
    #[serde(with = "nan_as_null")]
    pub min: f64,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, max: f64, min: f64) -> Self {
        Self { date, max, min }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Day of month (1-31), the sparkline x coordinate.
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// Summary statistics of one month.
///
/// Each field is `None` when the month has no finite reading for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub mean_max: Option<f64>,
    pub mean_min: Option<f64>,
    pub month_max: Option<f64>,
    pub month_min: Option<f64>,
}

/// Aggregated record for one (year, month) cell of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    pub has_data: bool,
    /// Readings sorted ascending by date, one per date.
    pub days: Vec<DailyRecord>,
    pub summary: Option<MonthSummary>,
}

impl MonthBucket {
    /// Placeholder for a month without readings.
    pub fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            has_data: false,
            days: Vec::new(),
            summary: None,
        }
    }

    /// `YYYY-MM` label.
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    /// First and last date covered by the bucket's readings.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.days.first()?;
        let last = self.days.last()?;
        Some((first.date, last.date))
    }
}

/// Widest year range a matrix may cover.
pub const MAX_YEAR_SPAN: usize = 500;

/// Inclusive range of calendar years shown as matrix columns.
///
/// Both bounds lie within the years `chrono` can represent and the range
/// covers at most `MAX_YEAR_SPAN` years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "YearRangeFields")]
pub struct YearRange {
    first: i32,
    last: i32,
}

/// Unchecked wire form of `YearRange`.
#[derive(Deserialize)]
struct YearRangeFields {
    first: i32,
    last: i32,
}

impl TryFrom<YearRangeFields> for YearRange {
    type Error = AppError;

    fn try_from(fields: YearRangeFields) -> Result<Self, Self::Error> {
        YearRange::new(fields.first, fields.last)
    }
}

impl YearRange {
    pub fn new(first: i32, last: i32) -> Result<Self, AppError> {
        let supported = NaiveDate::MIN.year()..=NaiveDate::MAX.year();
        for year in [first, last] {
            if !supported.contains(&year) {
                return Err(AppError::config(format!(
                    "Invalid year range: year {year} is outside {}..={}.",
                    supported.start(),
                    supported.end()
                )));
            }
        }
        if first > last {
            return Err(AppError::config(format!(
                "Invalid year range: first year {first} is after last year {last}."
            )));
        }
        let span = i64::from(last) - i64::from(first) + 1;
        if span > MAX_YEAR_SPAN as i64 {
            return Err(AppError::config(format!(
                "Invalid year range: {span} years requested, at most {MAX_YEAR_SPAN} are supported."
            )));
        }
        Ok(Self { first, last })
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn last(&self) -> i32 {
        self.last
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.first..=self.last).contains(&year)
    }

    pub fn years(self) -> impl Iterator<Item = i32> {
        self.first..=self.last
    }

    pub fn year_count(&self) -> usize {
        (i64::from(self.last) - i64::from(self.first) + 1) as usize
    }

    pub fn bucket_count(&self) -> usize {
        self.year_count() * MONTHS_PER_YEAR
    }

    /// Index of `(year, month)` in the year-major, month-minor grid.
    pub fn offset(&self, year: i32, month: u32) -> Option<usize> {
        if !self.contains(year) || !(1..=12).contains(&month) {
            return None;
        }
        let year_idx = (i64::from(year) - i64::from(self.first)) as usize;
        Some(year_idx * MONTHS_PER_YEAR + (month as usize - 1))
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST_YEAR,
            last: DEFAULT_LAST_YEAR,
        }
    }
}

/// Dense year × month grid produced by the aggregator.
///
/// `buckets[i]` is year `range.first() + i / 12`, month `i % 12 + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    pub range: YearRange,
    pub years: Vec<i32>,
    pub buckets: Vec<MonthBucket>,
}

impl MatrixSnapshot {
    pub fn bucket(&self, year: i32, month: u32) -> Option<&MonthBucket> {
        self.range.offset(year, month).and_then(|i| self.buckets.get(i))
    }

    /// Number of months with at least one reading.
    pub fn populated_months(&self) -> usize {
        self.buckets.iter().filter(|b| b.has_data).count()
    }

    /// Check the dense-grid invariants.
    ///
    /// Buckets must be complete and year-major. Each bucket's days must be
    /// strictly ascending and inside its month. A summary must be present
    /// exactly when the bucket has data.
    pub fn validate(&self) -> Result<(), String> {
        let expected_years: Vec<i32> = self.range.years().collect();
        if self.years != expected_years {
            return Err("year list does not match the year range".to_string());
        }
        if self.buckets.len() != self.range.bucket_count() {
            return Err(format!(
                "expected {} buckets, found {}",
                self.range.bucket_count(),
                self.buckets.len()
            ));
        }
        for (i, bucket) in self.buckets.iter().enumerate() {
            if self.range.offset(bucket.year, bucket.month) != Some(i) {
                return Err(format!("bucket {} is out of order at index {i}", bucket.label()));
            }
            if bucket.has_data == bucket.days.is_empty() {
                return Err(format!("bucket {} has inconsistent has_data flag", bucket.label()));
            }
            if bucket.has_data != bucket.summary.is_some() {
                return Err(format!("bucket {} has inconsistent summary", bucket.label()));
            }
            if let Some(day) = bucket
                .days
                .iter()
                .find(|d| d.year() != bucket.year || d.month() != bucket.month)
            {
                return Err(format!("bucket {} holds a day from {}", bucket.label(), day.date));
            }
            if let Some(pair) = bucket.days.windows(2).find(|w| w[0].date >= w[1].date) {
                return Err(format!(
                    "bucket {} days are not strictly ascending at {}",
                    bucket.label(),
                    pair[1].date
                ));
            }
        }
        Ok(())
    }
}

/// Which statistic colors a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// Highest daily maximum of the month.
    #[default]
    Max,
    /// Lowest daily minimum of the month.
    Min,
    /// Mean of the daily maxima.
    MeanMax,
    /// Mean of the daily minima.
    MeanMin,
}

impl ViewMode {
    /// Flip between the maximum and minimum flavor of the same statistic.
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Max => ViewMode::Min,
            ViewMode::Min => ViewMode::Max,
            ViewMode::MeanMax => ViewMode::MeanMin,
            ViewMode::MeanMin => ViewMode::MeanMax,
        }
    }

    pub fn value(self, summary: &MonthSummary) -> Option<f64> {
        match self {
            ViewMode::Max => summary.month_max,
            ViewMode::Min => summary.month_min,
            ViewMode::MeanMax => summary.mean_max,
            ViewMode::MeanMin => summary.mean_min,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ViewMode::Max => "monthly max",
            ViewMode::Min => "monthly min",
            ViewMode::MeanMax => "mean of daily max",
            ViewMode::MeanMin => "mean of daily min",
        }
    }
}

/// A run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment, and defaults.
#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub source: DataSource,
    pub range: YearRange,
    pub view: ViewMode,
}

/// Serialize non-finite temperatures as JSON `null` and read `null` back as `NaN`.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let value = value.is_finite().then_some(*value);
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
