//! Scales that map data values to positions and colors.
//!
//! These follow the usual visualization conventions (band, linear, quantize)
//! and are shared by the SVG renderer and the TUI so both agree on layout.

use crate::domain::DailyRecord;

pub mod palette;

pub use palette::{Rgb, PALETTE};

/// Lowest temperature of the color scale (°C).
pub const COLOR_DOMAIN_MIN: f64 = 0.0;
/// Highest temperature of the color scale (°C).
pub const COLOR_DOMAIN_MAX: f64 = 40.0;

/// Half-width used when a sparkline's value range collapses to a point.
pub const DEGENERATE_PAD: f64 = 1.0;

/// Evenly spaced bands for a discrete domain of `n` items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    n: usize,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Lay out `n` bands over `[r0, r1]`.
    ///
    /// `padding_inner` is the fraction of a step left empty between bands,
    /// `padding_outer` the fraction of a step before the first and after the
    /// last band. Leftover space is split evenly on both sides.
    pub fn new(n: usize, r0: f64, r1: f64, padding_inner: f64, padding_outer: f64) -> Self {
        let padding_inner = padding_inner.clamp(0.0, 1.0);
        let count = n as f64;
        let step = (r1 - r0) / (count - padding_inner + padding_outer * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (count - padding_inner)) * 0.5;
        Self {
            n,
            start,
            step,
            bandwidth: step * (1.0 - padding_inner),
        }
    }

    /// Leading edge of band `index`.
    pub fn position(&self, index: usize) -> Option<f64> {
        (index < self.n).then(|| self.start + self.step * index as f64)
    }

    /// Center of band `index`.
    pub fn center(&self, index: usize) -> Option<f64> {
        self.position(index).map(|p| p + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

/// Affine map from `[d0, d1]` onto `[r0, r1]` (either may be inverted).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }
}

/// Split a continuous domain into equal-width steps, one color per step.
#[derive(Debug, Clone)]
pub struct QuantizeScale {
    thresholds: Vec<f64>,
    colors: Vec<Rgb>,
}

impl QuantizeScale {
    pub fn new(domain: (f64, f64), colors: &[Rgb]) -> Self {
        let (lo, hi) = domain;
        let n = colors.len();
        let thresholds = (1..n)
            .map(|i| lo + (hi - lo) * i as f64 / n as f64)
            .collect();
        Self {
            thresholds,
            colors: colors.to_vec(),
        }
    }

    /// Color step for `value`; values beyond the domain clamp to the end colors.
    ///
    /// Returns `None` for non-finite input or an empty palette.
    pub fn color(&self, value: f64) -> Option<Rgb> {
        if value.is_nan() {
            return None;
        }
        let idx = self.thresholds.partition_point(|t| *t <= value);
        self.colors.get(idx).copied()
    }

    /// Temperature scale used by every heatmap.
    pub fn temperature() -> Self {
        Self::new((COLOR_DOMAIN_MIN, COLOR_DOMAIN_MAX), &PALETTE)
    }
}

/// Widen a zero-width range to `[value - 1, value + 1]`.
pub fn widen_degenerate(low: f64, high: f64) -> (f64, f64) {
    if low == high {
        (low - DEGENERATE_PAD, high + DEGENERATE_PAD)
    } else {
        (low, high)
    }
}

/// Vertical domain of a month's sparkline: lowest daily minimum to highest
/// daily maximum, widened when it collapses to a single value.
///
/// `None` when the month has no finite readings.
pub fn sparkline_range(days: &[DailyRecord]) -> Option<(f64, f64)> {
    let low = crate::aggregate::stats::min(days.iter().map(|d| d.min))?;
    let high = crate::aggregate::stats::max(days.iter().map(|d| d.max))?;
    Some(widen_degenerate(low, high))
}
