//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `memento_damage` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Result output
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use memento_damage::initialization::init_logger_with;
use memento_damage::{
    compute_memento, run_batch, BackgroundColor, Cli, Command, ComputeArgs, DamageReport,
    MementoRequest,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let outcome = match cli.command {
        Command::Compute(args) => run_compute(args).await,
        Command::Batch(args) => match run_batch(&args).await {
            Ok(report) => {
                eprintln!(
                    "Scored {} memento{} ({} succeeded, {} failed) in {:.1}s",
                    report.total_uris,
                    if report.total_uris == 1 { "" } else { "s" },
                    report.successful,
                    report.failed,
                    report.elapsed_seconds
                );
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = outcome {
        eprintln!("memento_damage error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

/// Envelope of the `compute` output.
#[derive(Serialize)]
struct ComputeOutput<'a> {
    result: &'a DamageReport,
}

/// Scores one memento and writes `{"result": ...}` to stdout or `--output`.
async fn run_compute(args: ComputeArgs) -> Result<()> {
    let background_override = args
        .background_color
        .as_deref()
        .map(str::parse::<BackgroundColor>)
        .transpose()
        .context("Invalid --background-color")?;

    let request = MementoRequest {
        background_override,
        use_window_size: args.use_window_size,
        ..MementoRequest::new(args.uri, args.cache_dir)
    };
    let report = tokio::task::spawn_blocking(move || compute_memento(&request))
        .await
        .context("Computation panicked")??;

    log::info!("Potential damage: {}", report.potential_damage.total);
    log::info!("Actual damage: {}", report.actual_damage.total);
    log::info!("Total damage: {}", report.total_damage);

    let body = serde_json::to_string(&ComputeOutput { result: &report })
        .context("Failed to serialize result")?;
    match args.output {
        Some(path) => tokio::fs::write(&path, format!("{}\n", body))
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", body),
    }
    Ok(())
}
