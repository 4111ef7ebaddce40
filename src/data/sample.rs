//! Synthetic daily temperature series for demos and tests.
//!
//! The series has a sinusoidal seasonal cycle peaking in late July, a
//! persistent (AR(1)) weather anomaly, and a noisy diurnal spread between the
//! daily maximum and minimum. Output is fully determined by the seed.

use std::f64::consts::TAU;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::Serialize;
use tracing::info;

use crate::domain::YearRange;
use crate::error::AppError;

/// Mean daily maximum over the year (°C).
const ANNUAL_MEAN_MAX: f64 = 25.5;
/// Seasonal half-swing of the daily maximum (°C).
const SEASONAL_AMPLITUDE: f64 = 6.0;
/// Day of year where the seasonal sine crosses zero on its way up.
const SEASONAL_PHASE_DAY: f64 = 109.0;
/// Day-to-day persistence of the weather anomaly.
const ANOMALY_PERSISTENCE: f64 = 0.7;
/// Std dev of the daily anomaly innovation (°C).
const ANOMALY_SIGMA: f64 = 1.8;
/// Typical gap between daily max and min (°C).
const DIURNAL_SPREAD: f64 = 4.5;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub range: YearRange,
    pub seed: u64,
    /// Probability that a whole month is left out of the output.
    pub drop_month_prob: f64,
}

/// One CSV row in the input schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    pub date: NaiveDate,
    pub max_temperature: f64,
    pub min_temperature: f64,
}

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<SampleRow>, AppError> {
    if !(0.0..1.0).contains(&config.drop_month_prob) {
        return Err(AppError::config("Drop-month probability must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::config(format!("Noise distribution error: {e}")))?;

    let mut rows = Vec::with_capacity(config.range.year_count() * 366);
    let mut anomaly = 0.0_f64;

    for year in config.range.years() {
        for month in 1..=12u32 {
            // Draw even for kept months so dropping does not shift later noise.
            let drop = rng.gen_bool(config.drop_month_prob);

            let Some(mut date) = NaiveDate::from_ymd_opt(year, month, 1) else {
                continue;
            };
            while date.month() == month {
                anomaly = ANOMALY_PERSISTENCE * anomaly + ANOMALY_SIGMA * noise.sample(&mut rng);
                let spread = DIURNAL_SPREAD + 0.8 * noise.sample(&mut rng).abs();

                if !drop {
                    let max = seasonal_max(date.ordinal()) + anomaly;
                    rows.push(SampleRow {
                        date,
                        max_temperature: round1(max),
                        min_temperature: round1(max - spread),
                    });
                }

                let Some(next) = date.succ_opt() else { break };
                date = next;
            }
        }
    }

    Ok(rows)
}

/// Write rows with the `date,max_temperature,min_temperature` header.
pub fn write_sample_csv(path: &Path, rows: &[SampleRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::render_failed(format!("failed to create '{}': {e}", path.display()))
    })?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::render_failed(format!("failed to write sample row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::render_failed(format!("failed to flush '{}': {e}", path.display())))?;

    info!(path = %path.display(), rows = rows.len(), "wrote sample data");
    Ok(())
}

fn seasonal_max(day_of_year: u32) -> f64 {
    let phase = (day_of_year as f64 - SEASONAL_PHASE_DAY) / 365.25 * TAU;
    ANNUAL_MEAN_MAX + SEASONAL_AMPLITUDE * phase.sin()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(drop_month_prob: f64) -> SampleConfig {
        SampleConfig {
            range: YearRange::new(2008, 2009).unwrap(),
            seed: 42,
            drop_month_prob,
        }
    }

    #[test]
    fn full_sample_covers_every_day() {
        let rows = generate_sample(&config(0.0)).unwrap();
        // 2008 is a leap year.
        assert_eq!(rows.len(), 366 + 365);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2008, 1, 1).unwrap());
        assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        assert!(rows.iter().all(|r| r.min_temperature < r.max_temperature));
    }

    #[test]
    fn same_seed_same_rows() {
        let a = generate_sample(&config(0.2)).unwrap();
        let b = generate_sample(&config(0.2)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn summer_is_warmer_than_winter() {
        let rows = generate_sample(&config(0.0)).unwrap();
        let mean_for = |month: u32| {
            let vals: Vec<f64> = rows
                .iter()
                .filter(|r| r.date.month() == month)
                .map(|r| r.max_temperature)
                .collect();
            vals.iter().sum::<f64>() / vals.len() as f64
        };
        assert!(mean_for(7) > mean_for(1) + 5.0);
    }

    #[test]
    fn dropped_months_are_whole_months() {
        let rows = generate_sample(&config(0.5)).unwrap();
        let mut months: Vec<(i32, u32)> = rows.iter().map(|r| (r.date.year(), r.date.month())).collect();
        months.dedup();
        assert!(months.len() < 24);
        for (y, m) in months {
            let days = rows
                .iter()
                .filter(|r| r.date.year() == y && r.date.month() == m)
                .count();
            assert!(days >= 28, "{y}-{m:02} is partial: {days} days");
        }
    }

    #[test]
    fn invalid_probability_is_rejected() {
        assert!(generate_sample(&config(1.0)).is_err());
        assert!(generate_sample(&config(-0.1)).is_err());
    }

    #[test]
    fn csv_has_input_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temperature_daily.csv");
        let rows = vec![SampleRow {
            date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            max_temperature: 5.0,
            min_temperature: -1.5,
        }];
        write_sample_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "date,max_temperature,min_temperature\n2010-01-01,5.0,-1.5\n");
    }
}
