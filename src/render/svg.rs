//! SVG heatmap rendered with Plotters.
//!
//! Years run along the top, months down the left. Each cell is filled from the
//! stepped temperature palette and carries two sparklines (daily max and
//! daily min). A vertical legend sits to the right of the grid.
//!
//! Everything is drawn in pixel coordinates on the root drawing area; the
//! band/linear scales in `crate::scale` do the positioning.

use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::domain::{MatrixSnapshot, MonthBucket, ViewMode, MONTHS_PER_YEAR};
use crate::error::AppError;
use crate::report::month_name;
use crate::scale::palette::{INK, NO_DATA, SPARK_MAX, SPARK_MIN};
use crate::scale::{sparkline_range, BandScale, LinearScale, QuantizeScale, Rgb, PALETTE};

#[derive(Debug, Clone, Copy)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

pub const MARGIN: Margin = Margin {
    top: 26,
    right: 165,
    bottom: 20,
    left: 58,
};

/// Nominal cell pitch before band padding.
pub const CELL_WIDTH: u32 = 74;
pub const CELL_HEIGHT: u32 = 46;

const YEAR_PADDING_INNER: f64 = 0.12;
const MONTH_PADDING_INNER: f64 = 0.2;
const PADDING_OUTER: f64 = 0.02;

/// Gap between a sparkline and its cell border.
const SPARK_INSET: f64 = 2.0;
/// Day-of-month domain of every sparkline.
const SPARK_DAYS: (f64, f64) = (1.0, 31.0);

const LEGEND_OFFSET_X: u32 = 28;
const LEGEND_OFFSET_Y: u32 = 18;
const LEGEND_WIDTH: u32 = 16;
const LEGEND_HEIGHT: u32 = 190;

const FONT: &str = "sans-serif";

/// Pixel geometry of the whole picture.
#[derive(Debug, Clone, Copy)]
pub struct MatrixLayout {
    pub width: u32,
    pub height: u32,
    pub plot_width: u32,
    pub plot_height: u32,
    /// Year columns, relative to the plot origin.
    pub x: BandScale,
    /// Month rows, relative to the plot origin.
    pub y: BandScale,
}

impl MatrixLayout {
    pub fn new(year_count: usize) -> Self {
        let plot_width = u32::try_from(year_count)
            .unwrap_or(u32::MAX)
            .saturating_mul(CELL_WIDTH);
        let plot_height = MONTHS_PER_YEAR as u32 * CELL_HEIGHT;
        Self {
            width: plot_width.saturating_add(MARGIN.left + MARGIN.right),
            height: MARGIN.top + plot_height + MARGIN.bottom,
            plot_width,
            plot_height,
            x: BandScale::new(year_count, 0.0, plot_width as f64, YEAR_PADDING_INNER, PADDING_OUTER),
            y: BandScale::new(
                MONTHS_PER_YEAR,
                0.0,
                plot_height as f64,
                MONTH_PADDING_INNER,
                PADDING_OUTER,
            ),
        }
    }

    /// Top-left corner of a cell in absolute pixels.
    fn cell_origin(&self, year_idx: usize, month_idx: usize) -> Option<(f64, f64)> {
        let x = self.x.position(year_idx)?;
        let y = self.y.position(month_idx)?;
        Some((MARGIN.left as f64 + x, MARGIN.top as f64 + y))
    }
}

/// Render the heatmap to an SVG file.
pub fn write_matrix_svg(path: &Path, snapshot: &MatrixSnapshot, view: ViewMode) -> Result<(), AppError> {
    let layout = MatrixLayout::new(snapshot.years.len());
    let root = SVGBackend::new(path, (layout.width, layout.height)).into_drawing_area();
    draw_matrix(&root, snapshot, view, &layout).map_err(AppError::render_failed)?;
    root.present().map_err(AppError::render_failed)?;

    info!(path = %path.display(), view = ?view, "wrote SVG heatmap");
    Ok(())
}

/// Render the heatmap to an in-memory SVG document.
pub fn render_matrix_svg(snapshot: &MatrixSnapshot, view: ViewMode) -> Result<String, AppError> {
    let layout = MatrixLayout::new(snapshot.years.len());
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (layout.width, layout.height)).into_drawing_area();
        draw_matrix(&root, snapshot, view, &layout).map_err(AppError::render_failed)?;
        root.present().map_err(AppError::render_failed)?;
    }
    Ok(svg)
}

fn draw_matrix<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    snapshot: &MatrixSnapshot,
    view: ViewMode,
    layout: &MatrixLayout,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    draw_axes(root, snapshot, layout)?;

    let colors = QuantizeScale::temperature();
    for (idx, bucket) in snapshot.buckets.iter().enumerate() {
        let year_idx = idx / MONTHS_PER_YEAR;
        let month_idx = idx % MONTHS_PER_YEAR;
        let Some(origin) = layout.cell_origin(year_idx, month_idx) else {
            continue;
        };
        draw_cell(root, bucket, origin, layout, &colors, view)?;
    }

    let legend_x = MARGIN.left + layout.plot_width + LEGEND_OFFSET_X;
    let legend_y = MARGIN.top + LEGEND_OFFSET_Y;
    draw_legend(root, legend_x as i32, legend_y as i32)?;

    Ok(())
}

fn draw_axes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    snapshot: &MatrixSnapshot,
    layout: &MatrixLayout,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let ink = rgb(INK);
    let year_style = (FONT, 12)
        .into_font()
        .color(&ink)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    let month_style = (FONT, 12)
        .into_font()
        .color(&ink)
        .pos(Pos::new(HPos::Right, VPos::Center));

    for (i, year) in snapshot.years.iter().enumerate() {
        let Some(cx) = layout.x.center(i) else { continue };
        let pos = (px(MARGIN.left as f64 + cx), MARGIN.top as i32 - 6);
        root.draw(&Text::new(year.to_string(), pos, year_style.clone()))?;
    }

    for m in 0..MONTHS_PER_YEAR {
        let Some(cy) = layout.y.center(m) else { continue };
        let pos = (MARGIN.left as i32 - 6, px(MARGIN.top as f64 + cy));
        root.draw(&Text::new(month_name(m as u32 + 1), pos, month_style.clone()))?;
    }

    Ok(())
}

fn draw_cell<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bucket: &MonthBucket,
    (x0, y0): (f64, f64),
    layout: &MatrixLayout,
    colors: &QuantizeScale,
    view: ViewMode,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let w = layout.x.bandwidth();
    let h = layout.y.bandwidth();

    let fill = bucket
        .summary
        .as_ref()
        .and_then(|s| view.value(s))
        .and_then(|v| colors.color(v))
        .unwrap_or(NO_DATA);
    root.draw(&Rectangle::new(
        [(px(x0), px(y0)), (px(x0 + w), px(y0 + h))],
        rgb(fill).filled(),
    ))?;

    let Some((low, high)) = sparkline_range(&bucket.days) else {
        return Ok(());
    };
    let sx = LinearScale::new(SPARK_DAYS, (x0 + SPARK_INSET, x0 + w - SPARK_INSET));
    let sy = LinearScale::new((low, high), (y0 + h - SPARK_INSET, y0 + SPARK_INSET));

    let trace = |pick: fn(&crate::domain::DailyRecord) -> f64| -> Vec<(i32, i32)> {
        bucket
            .days
            .iter()
            .filter(|d| pick(d).is_finite())
            .map(|d| (px(sx.apply(d.day() as f64)), px(sy.apply(pick(d)))))
            .collect()
    };

    root.draw(&PathElement::new(trace(|d| d.max), rgb(SPARK_MAX).stroke_width(1)))?;
    root.draw(&PathElement::new(trace(|d| d.min), rgb(SPARK_MIN).stroke_width(1)))?;

    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    x: i32,
    y: i32,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let w = LEGEND_WIDTH as i32;
    let h = LEGEND_HEIGHT as i32;
    let block = LEGEND_HEIGHT as f64 / PALETTE.len() as f64;

    for (i, color) in PALETTE.iter().enumerate() {
        let top = y + px(i as f64 * block);
        let bottom = y + px((i + 1) as f64 * block);
        root.draw(&Rectangle::new([(x, top), (x + w, bottom)], rgb(*color).filled()))?;
    }
    root.draw(&Rectangle::new([(x, y), (x + w, y + h)], rgb(INK).stroke_width(1)))?;

    let label = (FONT, 11).into_font().color(&rgb(INK));
    root.draw(&Text::new(
        "0 Celsius",
        (x + w + 8, y),
        label.pos(Pos::new(HPos::Left, VPos::Top)),
    ))?;
    root.draw(&Text::new(
        "40 Celsius",
        (x + w + 8, y + h),
        label.pos(Pos::new(HPos::Left, VPos::Bottom)),
    ))?;

    Ok(())
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn px(v: f64) -> i32 {
    v.round() as i32
}
