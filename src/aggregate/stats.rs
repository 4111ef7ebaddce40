//! NaN-skipping statistics over daily readings.
//!
//! A reading that failed to parse is carried as `NaN`; it must not poison a
//! month's mean or extremes, so every function here ignores non-finite values
//! and returns `None` when nothing is left.

use crate::domain::{DailyRecord, MonthSummary};

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub fn max(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}

pub fn min(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
}

/// Mean and extremes of a month's daily maxima and minima.
pub fn summarize(days: &[DailyRecord]) -> MonthSummary {
    MonthSummary {
        mean_max: mean(days.iter().map(|d| d.max)),
        mean_min: mean(days.iter().map(|d| d.min)),
        month_max: max(days.iter().map(|d| d.max)),
        month_min: min(days.iter().map(|d| d.min)),
    }
}
