//! SwingScan command-line front end.
//!
//! Commands:
//! - `scan`: screen every golden-list ticker and print the ranked buy list
//! - `features`: dump one ticker's labeled feature table as CSV
//! - `config`: print the default configuration as TOML

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use swingscan_core::data::{CsvDirectory, DataError, GoldenList, SeriesSource};
use swingscan_core::features::{build_labels, FeatureEngine};
use swingscan_runner::report::{export_features_csv, write_csv, write_json};
use swingscan_runner::{format_report, run_scan, ScanConfig};

const RULE_WIDTH: usize = 40;

#[derive(Parser)]
#[command(
    name = "swingscan",
    version,
    about = "SwingScan CLI: per-ticker swing-trade screener"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen the golden list and print high-confidence buy candidates.
    Scan {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory of per-ticker CSV files (overrides the config).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Golden-list CSV (overrides the config).
        #[arg(long)]
        golden_list: Option<PathBuf>,

        /// Scan tickers in parallel.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Also write the recommendations to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also write the recommendations to this JSON file.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print one ticker's labeled feature table as CSV.
    Features {
        /// Ticker whose file to load.
        ticker: String,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory of per-ticker CSV files (overrides the config).
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scan {
            config,
            data_dir,
            golden_list,
            parallel,
            csv,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(dir) = data_dir {
                config.paths.data_dir = dir;
            }
            if let Some(path) = golden_list {
                config.paths.golden_list = path;
            }
            config.scan.parallel |= parallel;
            run_scan_cmd(&config, csv.as_deref(), json.as_deref())
        }
        Commands::Features {
            ticker,
            config,
            data_dir,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(dir) = data_dir {
                config.paths.data_dir = dir;
            }
            run_features_cmd(&config, &ticker)
        }
        Commands::Config => {
            print!("{}", ScanConfig::default().to_toml()?);
            Ok(())
        }
    }
}

/// Logs go to stderr so the report on stdout stays clean.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ScanConfig::default()),
    }
}

fn run_scan_cmd(config: &ScanConfig, csv: Option<&Path>, json: Option<&Path>) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{rule}");
    println!("SWINGSCAN MULTI-FILE AI SCANNER");
    println!("{rule}");

    let golden = match GoldenList::from_csv(&config.paths.golden_list) {
        Ok(golden) => golden,
        Err(DataError::GoldenListMissing { path }) => {
            eprintln!("ERROR: Golden List not found at: {}", path.display());
            eprintln!("Hint: export the golden-list CSV from the research notebook first, or pass --golden-list.");
            println!("{rule}");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("failed to read golden list"),
    };

    let source = CsvDirectory::new(&config.paths.data_dir);
    println!(
        "Searching for {} tickers in: {}",
        golden.len(),
        source.root().display()
    );
    debug!(source = source.name(), parallel = config.scan.parallel, "starting scan");

    let report = run_scan(config, &source, golden.tickers());
    println!();
    print!("{}", format_report(&report.recommendations));

    if let Some(path) = csv {
        write_csv(path, &report.recommendations)?;
    }
    if let Some(path) = json {
        write_json(path, &report.recommendations)?;
    }

    println!("{rule}");
    Ok(())
}

fn run_features_cmd(config: &ScanConfig, ticker: &str) -> Result<()> {
    let source = CsvDirectory::new(&config.paths.data_dir);
    let bars = source
        .load(ticker)
        .with_context(|| format!("failed to load {ticker}"))?;

    let engine = FeatureEngine::new(config.features.clone());
    let rows = engine.build(&bars);
    let labeled = build_labels(&bars, rows, &config.labels);
    debug!(ticker, bars = bars.len(), labeled = labeled.len(), "feature table built");

    print!("{}", export_features_csv(&labeled)?);
    Ok(())
}
