//! Command-line parsing for the temperature matrix tool.
//!
//! Argument parsing and command dispatch stay separate from the loading and
//! aggregation code. Data flags can also come from `TMX_*` environment
//! variables (or a `.env` file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::data::DEFAULT_DATA_FILE;
use crate::domain::{DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR, ViewMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tmx", version, about = "Daily temperature year × month matrix")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive matrix in the terminal.
    Tui(DataArgs),
    /// Write the heatmap as an SVG file.
    Render(RenderArgs),
    /// Print a dataset summary and a text matrix.
    Summary(DataArgs),
    /// Write the aggregated grid as JSON or CSV.
    Export(ExportArgs),
    /// Write a seeded synthetic dataset in the input CSV schema.
    Sample(SampleArgs),
}

/// Where to load data from and what to aggregate.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV file path or http(s) URL.
    #[arg(short = 'd', long, env = "TMX_DATA", default_value = DEFAULT_DATA_FILE)]
    pub data: String,

    /// First year of the matrix (inclusive).
    #[arg(long, env = "TMX_FIRST_YEAR", default_value_t = DEFAULT_FIRST_YEAR)]
    pub first_year: i32,

    /// Last year of the matrix (inclusive).
    #[arg(long, env = "TMX_LAST_YEAR", default_value_t = DEFAULT_LAST_YEAR)]
    pub last_year: i32,

    /// Statistic used to color cells [default: max].
    ///
    /// With `render --snapshot`, overrides the view saved in the file.
    #[arg(long, env = "TMX_VIEW", value_enum)]
    pub view: Option<ViewMode>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output SVG path.
    #[arg(short = 'o', long, value_name = "SVG", default_value = "matrix.svg")]
    pub out: PathBuf,

    /// Render a grid saved by `tmx export --format json` instead of loading data.
    ///
    /// Data flags are ignored except `--view`.
    #[arg(long, value_name = "JSON")]
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output path.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, default_value = DEFAULT_DATA_FILE)]
    pub out: PathBuf,

    #[arg(long, default_value_t = DEFAULT_FIRST_YEAR)]
    pub first_year: i32,

    #[arg(long, default_value_t = DEFAULT_LAST_YEAR)]
    pub last_year: i32,

    /// Random seed; the same seed always produces the same file.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Probability of leaving a whole month out (to exercise empty cells).
    #[arg(long, default_value_t = 0.0)]
    pub drop_month_prob: f64,
}
