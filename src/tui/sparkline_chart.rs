//! Plotters-powered sparkline chart widget for Ratatui.
//!
//! Shows the daily maxima and minima of the selected month. Plotters output is
//! drawn into the Ratatui buffer through `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description; series and bounds are computed by the caller.
pub struct SparklineChart<'a> {
    /// `(day of month, daily max)` points.
    pub max: &'a [(f64, f64)],
    /// `(day of month, daily min)` points.
    pub min: &'a [(f64, f64)],
    /// Day-of-month bounds.
    pub x_bounds: [f64; 2],
    /// Temperature bounds; must already be widened when the month is flat.
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for SparklineChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(5)
                .y_labels(4)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            let max_color = RGBColor(239, 107, 71);
            let min_color = RGBColor(79, 143, 205);

            chart.draw_series(LineSeries::new(self.max.iter().copied(), &max_color))?;
            chart.draw_series(LineSeries::new(self.min.iter().copied(), &min_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
