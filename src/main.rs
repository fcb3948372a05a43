//! disaster-gold: merge the silver weather and disaster tables of every
//! roster city into labeled gold parquet files.

use clap::Parser;
use disaster_gold::{PipelineConfig, PipelineError, SilverToGold};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Builds the gold tier from the silver tier.
#[derive(Parser)]
#[command(name = "disaster-gold")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Silver tier root, overriding the configuration.
    #[arg(long)]
    silver: Option<PathBuf>,

    /// Gold tier root, overriding the configuration.
    #[arg(long)]
    gold: Option<PathBuf>,

    /// Write the batch report as JSON to this file.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<PipelineConfig, PipelineError> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_toml_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(silver) = &cli.silver {
        config.silver_root = silver.clone();
    }
    if let Some(gold) = &cli.gold {
        config.gold_root = gold.clone();
    }
    Ok(config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let report = SilverToGold::new(config).run();
    report.log_summary();
    info!("Execution time: {:.2} seconds", start.elapsed().as_secs_f64());

    if let Some(path) = &cli.report {
        if let Err(e) = report.write_json(path) {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
        info!("Batch report written to {:?}", path);
    }

    // Failed units are part of the report, not a failed run.
    ExitCode::SUCCESS
}
