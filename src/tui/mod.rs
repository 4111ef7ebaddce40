//! Ratatui-based terminal UI.
//!
//! Shows the year × month matrix with a movable cursor. The selected cell's
//! caption is shown in the side panel together with a sparkline chart of its
//! daily readings; space toggles between the max and min view.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::domain::{MONTHS_PER_YEAR, MatrixSnapshot, MonthBucket, ViewMode};
use crate::error::{AppError, EXIT_OUTPUT};
use crate::report::{cell_caption, month_name};
use crate::scale::{QuantizeScale, Rgb, PALETTE, sparkline_range};

mod sparkline_chart;

use sparkline_chart::SparklineChart;

/// Width of the month-name column.
const LABEL_WIDTH: usize = 10;
/// Width of one year column.
const CELL_WIDTH: usize = 7;

/// Start the TUI on an already aggregated matrix.
pub fn run(snapshot: MatrixSnapshot, view: ViewMode) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(snapshot, view);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_OUTPUT,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    snapshot: MatrixSnapshot,
    view: ViewMode,
    year_idx: usize,
    month_idx: usize,
    colors: QuantizeScale,
}

impl App {
    fn new(snapshot: MatrixSnapshot, view: ViewMode) -> Self {
        Self {
            snapshot,
            view,
            year_idx: 0,
            month_idx: 0,
            colors: QuantizeScale::temperature(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_OUTPUT, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply a key press; returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let year_count = self.snapshot.years.len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left | KeyCode::Char('h') => {
                self.year_idx = self.year_idx.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.year_idx + 1 < year_count {
                    self.year_idx += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.month_idx = self.month_idx.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.month_idx + 1 < MONTHS_PER_YEAR {
                    self.month_idx += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('v') => {
                self.view = self.view.toggle();
            }
            _ => {}
        }
        false
    }

    fn selected(&self) -> Option<&MonthBucket> {
        self.snapshot
            .buckets
            .get(self.year_idx * MONTHS_PER_YEAR + self.month_idx)
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("tmx", Style::default().fg(Color::Cyan)),
                Span::raw(" - daily temperature matrix"),
            ]),
            Line::from(Span::styled(
                format!(
                    "years: {}-{} | view: {} | months with data: {}/{}",
                    self.snapshot.range.first(),
                    self.snapshot.range.last(),
                    self.view.display_name(),
                    self.snapshot.populated_months(),
                    self.snapshot.buckets.len(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let matrix_width = matrix_width(self.snapshot.years.len());
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(matrix_width), Constraint::Min(24)])
            .split(area);

        self.draw_matrix(frame, chunks[0]);
        self.draw_detail(frame, chunks[1]);
    }

    fn draw_matrix(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = Vec::with_capacity(MONTHS_PER_YEAR + 1);

        let mut header = vec![Span::raw(" ".repeat(LABEL_WIDTH))];
        for (i, year) in self.snapshot.years.iter().enumerate() {
            let style = if i == self.year_idx {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            header.push(Span::styled(format!("{year:>width$}", width = CELL_WIDTH), style));
        }
        lines.push(Line::from(header));

        for m in 0..MONTHS_PER_YEAR {
            let label_style = if m == self.month_idx {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut spans = vec![Span::styled(
                format!("{:<width$}", month_name(m as u32 + 1), width = LABEL_WIDTH),
                label_style,
            )];

            for y in 0..self.snapshot.years.len() {
                let Some(bucket) = self.snapshot.buckets.get(y * MONTHS_PER_YEAR + m) else {
                    continue;
                };
                let selected = y == self.year_idx && m == self.month_idx;
                spans.push(self.cell_span(bucket, selected));
            }
            lines.push(Line::from(spans));
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Matrix").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn cell_span(&self, bucket: &MonthBucket, selected: bool) -> Span<'static> {
        let value = bucket.summary.as_ref().and_then(|s| self.view.value(s));
        let fill = value
            .and_then(|v| self.colors.color(v))
            .unwrap_or(crate::scale::palette::NO_DATA);

        let text = match value {
            Some(v) => format!("{v:>width$.1} ", width = CELL_WIDTH - 1),
            None => format!("{:>width$} ", "--", width = CELL_WIDTH - 1),
        };

        let mut style = Style::default().fg(Color::Black).bg(color(fill));
        if selected {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        Span::styled(text, style)
    }

    fn draw_detail(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Month").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(2)])
            .split(inner);

        let Some(bucket) = self.selected() else {
            return;
        };

        let caption: Vec<Line> = cell_caption(bucket).lines().map(|l| Line::from(l.to_string())).collect();
        frame.render_widget(
            Paragraph::new(Text::from(caption)).style(Style::default().fg(Color::Yellow)),
            chunks[0],
        );

        match sparkline_range(&bucket.days) {
            Some((low, high)) => {
                let (max, min) = spark_series(bucket);
                let chart = SparklineChart {
                    max: &max,
                    min: &min,
                    x_bounds: [1.0, 31.0],
                    y_bounds: [low, high],
                };
                frame.render_widget(chart, chunks[1]);
            }
            None => {
                let msg = Paragraph::new("No readings to plot.").style(Style::default().fg(Color::DarkGray));
                frame.render_widget(msg, chunks[1]);
            }
        }

        frame.render_widget(Paragraph::new(legend_line()), chunks[2]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→/↑/↓ move  space toggle max/min  q quit";
        let line = Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Columns needed by the matrix panel, clamped to what a terminal can address.
fn matrix_width(year_count: usize) -> u16 {
    let columns = CELL_WIDTH
        .saturating_mul(year_count)
        .saturating_add(LABEL_WIDTH + 2);
    u16::try_from(columns).unwrap_or(u16::MAX)
}

/// `(day, max)` and `(day, min)` points of a month, skipping `NaN` readings.
fn spark_series(bucket: &MonthBucket) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let max = bucket
        .days
        .iter()
        .filter(|d| d.max.is_finite())
        .map(|d| (d.day() as f64, d.max))
        .collect();
    let min = bucket
        .days
        .iter()
        .filter(|d| d.min.is_finite())
        .map(|d| (d.day() as f64, d.min))
        .collect();
    (max, min)
}

fn legend_line() -> Line<'static> {
    let mut spans = vec![Span::styled("0°C ", Style::default().fg(Color::Gray))];
    spans.extend(
        PALETTE
            .iter()
            .map(|c| Span::styled("  ", Style::default().bg(color(*c)))),
    );
    spans.push(Span::styled(" 40°C", Style::default().fg(Color::Gray)));
    Line::from(spans)
}

fn color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::domain::{DailyRecord, YearRange};
    use chrono::NaiveDate;

    fn app() -> App {
        let records = [
            DailyRecord::new(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(), 5.0, -1.0),
            DailyRecord::new(NaiveDate::from_ymd_opt(2010, 1, 2).unwrap(), f64::NAN, 0.0),
        ];
        App::new(aggregate(&records, YearRange::new(2010, 2011).unwrap()), ViewMode::Max)
    }

    #[test]
    fn cursor_stays_inside_the_grid() {
        let mut app = app();
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Up);
        assert_eq!((app.year_idx, app.month_idx), (0, 0));

        for _ in 0..5 {
            app.handle_key(KeyCode::Right);
        }
        for _ in 0..20 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!((app.year_idx, app.month_idx), (1, 11));
        assert_eq!(app.selected().unwrap().label(), "2011-12");
    }

    #[test]
    fn space_toggles_view_and_q_quits() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char(' ')));
        assert_eq!(app.view, ViewMode::Min);
        assert!(!app.handle_key(KeyCode::Enter));
        assert_eq!(app.view, ViewMode::Max);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn matrix_width_saturates() {
        assert_eq!(matrix_width(10), 82);
        assert_eq!(matrix_width(20_000), u16::MAX);
        assert_eq!(matrix_width(usize::MAX), u16::MAX);
    }

    #[test]
    fn spark_series_skips_nan() {
        let app = app();
        let (max, min) = spark_series(app.selected().unwrap());
        assert_eq!(max, vec![(1.0, 5.0)]);
        assert_eq!(min, vec![(1.0, -1.0), (2.0, 0.0)]);
    }
}
