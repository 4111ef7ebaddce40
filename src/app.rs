//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - sets up logging and loads `.env`
//! - parses CLI arguments
//! - runs the load/aggregate pipeline
//! - hands the matrix to the TUI, the SVG renderer, or an exporter

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DataArgs, ExportArgs, ExportFormat, RenderArgs, SampleArgs};
use crate::data::{DataSource, SampleConfig, generate_sample, write_sample_csv};
use crate::domain::{MatrixConfig, ViewMode, YearRange};
use crate::error::AppError;

pub mod pipeline;

const DEFAULT_LOG_FILTER: &str = "warn,temp_matrix=info";

/// Entry point for the `tmx` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // `tmx` and `tmx --data x.csv` behave like `tmx tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Render(args) => handle_render(args),
        Command::Summary(args) => handle_summary(args),
        Command::Export(args) => handle_export(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_tui(args: DataArgs) -> Result<(), AppError> {
    let config = matrix_config_from_args(&args)?;
    let run = pipeline::run_pipeline(&config)?;
    crate::tui::run(run.snapshot, config.view)
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let (snapshot, view) = match &args.snapshot {
        Some(path) => {
            let doc = crate::io::read_snapshot_json(path)?;
            (doc.matrix, snapshot_view(&args.data, doc.view))
        }
        None => {
            let config = matrix_config_from_args(&args.data)?;
            (pipeline::run_pipeline(&config)?.snapshot, config.view)
        }
    };

    crate::render::write_matrix_svg(&args.out, &snapshot, view)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_summary(args: DataArgs) -> Result<(), AppError> {
    let config = matrix_config_from_args(&args)?;
    let run = pipeline::run_pipeline(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&config.source.to_string(), &run.ingest, &run.snapshot, config.view)
    );
    print!("{}", crate::report::format_matrix(&run.snapshot, config.view));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = matrix_config_from_args(&args.data)?;
    let run = pipeline::run_pipeline(&config)?;

    match args.format {
        ExportFormat::Json => crate::io::write_snapshot_json(&args.out, &run.snapshot, config.view)?,
        ExportFormat::Csv => crate::io::write_matrix_csv(&args.out, &run.snapshot)?,
    }
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        range: YearRange::new(args.first_year, args.last_year)?,
        seed: args.seed,
        drop_month_prob: args.drop_month_prob,
    };
    let rows = generate_sample(&config)?;
    write_sample_csv(&args.out, &rows)?;

    println!("Wrote {} rows to {}", rows.len(), args.out.display());
    Ok(())
}

pub fn matrix_config_from_args(args: &DataArgs) -> Result<MatrixConfig, AppError> {
    Ok(MatrixConfig {
        source: DataSource::parse(&args.data),
        range: YearRange::new(args.first_year, args.last_year)?,
        view: args.view.unwrap_or_default(),
    })
}

/// View for a saved grid: an explicit `--view` wins over the one in the file.
fn snapshot_view(args: &DataArgs, saved: ViewMode) -> ViewMode {
    args.view.unwrap_or(saved)
}

/// Rewrite argv so `tmx` defaults to `tmx tui`.
///
/// Rules:
/// - `tmx`                      -> `tmx tui`
/// - `tmx --data x.csv ...`     -> `tmx tui --data x.csv ...`
/// - `tmx --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "render" | "summary" | "export" | "sample");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_CONFIG;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["tmx"])), argv(&["tmx", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["tmx", "--data", "x.csv"])),
            argv(&["tmx", "tui", "--data", "x.csv"])
        );
        assert_eq!(rewrite_args(argv(&["tmx", "summary"])), argv(&["tmx", "summary"]));
        assert_eq!(rewrite_args(argv(&["tmx", "--help"])), argv(&["tmx", "--help"]));
    }

    #[test]
    fn inverted_range_is_a_config_error() {
        let args = DataArgs {
            data: "https://example.com/t.csv".to_string(),
            first_year: 2017,
            last_year: 2008,
            view: Some(ViewMode::Max),
        };
        let err = matrix_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn url_data_flag_becomes_url_source() {
        let args = DataArgs {
            data: "https://example.com/t.csv".to_string(),
            first_year: 2008,
            last_year: 2017,
            view: Some(ViewMode::Min),
        };
        let config = matrix_config_from_args(&args).unwrap();
        assert_eq!(config.source, DataSource::Url("https://example.com/t.csv".to_string()));
        assert_eq!(config.range.year_count(), 10);
        assert_eq!(config.view, ViewMode::Min);
    }

    #[test]
    fn explicit_view_overrides_saved_snapshot_view() {
        let mut args = DataArgs {
            data: "temperature_daily.csv".to_string(),
            first_year: 2008,
            last_year: 2017,
            view: None,
        };
        assert_eq!(snapshot_view(&args, ViewMode::MeanMin), ViewMode::MeanMin);
        assert_eq!(matrix_config_from_args(&args).unwrap().view, ViewMode::Max);

        args.view = Some(ViewMode::Min);
        assert_eq!(snapshot_view(&args, ViewMode::MeanMin), ViewMode::Min);
    }

    #[test]
    fn unbounded_year_flags_are_config_errors() {
        let args = DataArgs {
            data: "temperature_daily.csv".to_string(),
            first_year: i32::MIN,
            last_year: i32::MAX,
            view: None,
        };
        let err = matrix_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }
}
