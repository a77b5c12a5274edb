//! CLI entry point for the crime data pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use crime_processing::profiler::DataProfiler;
use crime_processing::{
    ComprehensiveReport, CrimeDataError, Dashboard, DashboardConfig, EmptyDirectoryPolicy,
    FileOrder, ModeTieBreak, Pipeline, PipelineConfig, PipelineResult, ReportGenerator,
};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the default dataset directory.
const DATASET_DIR_ENV: &str = "CRIME_DATASET_DIR";

/// CLI-compatible mode tie-break enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTieBreak {
    /// Smallest value among the most frequent
    Lexicographic,
    /// Most frequent value seen first
    FirstEncountered,
}

impl From<CliTieBreak> for ModeTieBreak {
    fn from(cli: CliTieBreak) -> Self {
        match cli {
            CliTieBreak::Lexicographic => ModeTieBreak::Lexicographic,
            CliTieBreak::FirstEncountered => ModeTieBreak::FirstEncountered,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Crime dataset loader and cleaner",
    long_about = "Loads every CSV export in a directory, combines them and cleans the result \
                  for the crime dashboard.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  CRIME_DATASET_DIR    Dataset directory used when --dataset-dir is not given\n\n\
                  EXAMPLES:\n  \
                  # Summarise ./Dataset\n  \
                  crime-processing\n\n  \
                  # Save the cleaned table and chart configuration\n  \
                  crime-processing -d data/met -o results/ --save-cleaned --emit-dashboard\n\n  \
                  # Machine-readable report\n  \
                  crime-processing -d data/met --json"
)]
struct Args {
    /// Directory holding the CSV exports
    ///
    /// Defaults to $CRIME_DATASET_DIR, then "Dataset"
    #[arg(short, long)]
    dataset_dir: Option<PathBuf>,

    /// Load files sorted by name instead of directory listing order
    #[arg(long)]
    sort_files: bool,

    /// How to pick the mode when several values are equally frequent
    #[arg(long, value_enum, default_value = "lexicographic")]
    tie_break: CliTieBreak,

    /// Produce an empty table instead of failing when no CSV files exist
    #[arg(long)]
    allow_empty: bool,

    /// Missing column threshold (0.0 - 1.0)
    ///
    /// Columns other than the required ones with missing values above this
    /// fraction are dropped. Off unless given.
    #[arg(long)]
    missing_col_threshold: Option<f64>,

    /// Output directory for written files
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Write the cleaned table as CSV to the output directory
    #[arg(long)]
    save_cleaned: bool,

    /// Write a detailed JSON report to the output directory
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write the dashboard chart configuration to the output directory
    #[arg(long)]
    emit_dashboard: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings, errors and the final result
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true no subscriber is installed, so stdout only
/// carries the report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level, quiet))
        .with_target(false)
        .init();
}

/// `RUST_LOG` when set (possibly from `.env`), otherwise the CLI level.
fn env_filter(level: &str, quiet: bool) -> EnvFilter {
    let effective_level = if quiet { "warn" } else { level };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file, before RUST_LOG is read
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    let dataset_dir = resolve_dataset_dir(args.dataset_dir.clone());
    let config = build_config(&args, dataset_dir)?;
    let pipeline = Pipeline::builder().config(config).build()?;

    info!("{}", "=".repeat(80));
    info!("Starting crime data pipeline...");
    info!("{}", "=".repeat(80));

    match pipeline.process() {
        Ok(result) => handle_pipeline_output(&result, &args),
        Err(e) => {
            let message = describe_failure(&e);
            error!("{}", message);
            Err(anyhow!(message))
        }
    }
}

/// Data errors point at the dataset contents rather than at the setup.
fn describe_failure(e: &CrimeDataError) -> String {
    if e.is_data_error() {
        format!("Dataset could not be cleaned [{}]: {}", e.error_code(), e)
    } else {
        format!("Pipeline failed: {}", e)
    }
}

/// The `--dataset-dir` flag wins over the environment, which wins over
/// the "Dataset" default.
fn resolve_dataset_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(DATASET_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("Dataset"))
}

fn build_config(args: &Args, dataset_dir: PathBuf) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder()
        .dataset_dir(dataset_dir)
        .mode_tie_break(args.tie_break.into());

    if args.sort_files {
        builder = builder.file_order(FileOrder::Name);
    }
    if args.allow_empty {
        builder = builder.empty_directory(EmptyDirectoryPolicy::Empty);
    }
    if let Some(threshold) = args.missing_col_threshold {
        builder = builder.missing_column_threshold(threshold);
    }

    Ok(builder.build()?)
}

/// Handle pipeline output based on CLI flags.
///
/// - Default: print a human-readable summary to stdout
/// - `--json`: print the report as JSON to stdout only
/// - `--save-cleaned`, `--emit-report`, `--emit-dashboard`: write files
fn handle_pipeline_output(result: &PipelineResult, args: &Args) -> Result<()> {
    let base_name = dataset_base_name(&result.input_dir);
    let generator = ReportGenerator::new(&args.output);

    let output_file = if args.save_cleaned {
        Some(generator.save_cleaned_dataset(&result.cleaned, &format!("{}_cleaned", base_name))?)
    } else {
        None
    };

    if args.emit_dashboard && result.cleaned.width() == 0 {
        warn!("Skipping dashboard: the cleaned table has no columns");
    } else if args.emit_dashboard {
        let dashboard = Dashboard::new(&DashboardConfig::default(), &result.cleaned)?;
        generator.write_dashboard(&dashboard, &base_name)?;
    }

    let report = ReportGenerator::build_comprehensive_report(result, output_file.as_deref())?;

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &base_name)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&report, result);

    Ok(())
}

/// Name used for output files, taken from the dataset directory.
fn dataset_base_name(dir: &Path) -> String {
    dir.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("crimes")
        .to_string()
}

/// Preview, info, missing values before and after, then statistics.
fn print_human_readable_summary(report: &ComprehensiveReport, result: &PipelineResult) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CRIME DATA CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Input:  {} ({} files)", report.input_dir, report.files.len());
    for file in &report.files {
        println!("  - {} ({} rows)", file.path.display(), file.rows);
    }
    if let Some(ref output_file) = report.output_file {
        println!("Output: {}", output_file);
    }
    println!();

    println!("PREVIEW");
    println!("{}", "-".repeat(40));
    println!("{}", DataProfiler::head(result.cleaned.data(), 5));
    println!();

    println!("DATASET INFO (before cleaning)");
    println!("{}", "-".repeat(40));
    let (rows, cols) = report.profile_before.shape;
    println!("  {} rows x {} columns", rows, cols);
    println!("{:<25} {:<10} {:<10}", "Column", "Non-Null", "Dtype");
    for col in &report.profile_before.column_profiles {
        println!(
            "{:<25} {:<10} {:<10}",
            truncate_str(&col.name, 24),
            col.non_null_count,
            col.dtype
        );
    }
    println!();

    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));
    for missing in &report.cleaning.missing_before {
        println!("  {:<25} {}", truncate_str(&missing.column, 24), missing.missing);
    }
    println!();

    println!("MISSING VALUES AFTER HANDLING");
    println!("{}", "-".repeat(40));
    for missing in &report.cleaning.missing_after {
        println!("  {:<25} {}", truncate_str(&missing.column, 24), missing.missing);
    }
    println!();

    if !report.numeric_summary.is_empty() {
        println!("NUMERIC SUMMARY");
        println!("{}", "-".repeat(40));
        println!(
            "{:<12} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        for s in &report.numeric_summary {
            println!(
                "{:<12} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                truncate_str(&s.column, 11),
                s.count,
                fmt_stat(s.mean),
                fmt_stat(s.std),
                fmt_stat(s.min),
                fmt_stat(s.q25),
                fmt_stat(s.median),
                fmt_stat(s.q75),
                fmt_stat(s.max)
            );
        }
        println!();
    }

    if !report.categorical_summary.is_empty() {
        println!("CATEGORICAL SUMMARY");
        println!("{}", "-".repeat(40));
        println!(
            "{:<25} {:>8} {:>8} {:<32} {:>8}",
            "Column", "count", "unique", "top", "freq"
        );
        for s in &report.categorical_summary {
            println!(
                "{:<25} {:>8} {:>8} {:<32} {:>8}",
                truncate_str(&s.column, 24),
                s.count,
                s.unique,
                truncate_str(s.top.as_deref().unwrap_or("-"), 31),
                s.freq
            );
        }
        println!();
    }

    if !report.cleaning.actions.is_empty() {
        println!("Actions Taken:");
        for action in &report.cleaning.actions {
            println!("  - {}", action);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{:.6}", v))
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
