use anyhow::Context;
use clap::Parser;
use coord_cleaner::cli::{Args, setup_logging};
use coord_cleaner::models::CleaningStats;
use coord_cleaner::processor::CoordinateCleaner;
use coord_cleaner::{CleanerError, report};
use std::process;
use tracing::info;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                let reason = match signal {
                    Ok(()) => "Processing interrupted by user".to_string(),
                    Err(e) => format!("Failed to listen for CTRL+C: {}", e),
                };
                Err(CleanerError::Interrupted { reason }.into())
            }
        }
    });

    match result {
        Ok(_stats) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<CleaningStats> {
    args.validate().context("Invalid arguments")?;
    let config = args.load_config().context("Failed to load configuration")?;
    info!(
        "Mode: {}, corners: {:?}",
        config.matching.mode, config.matching.corners
    );

    let format = config.output.format;
    let cleaner = CoordinateCleaner::new(args.paths(), config)
        .context("Failed to prepare cleaning run")?;
    let stats = cleaner.run().await.context("Cleaning run failed")?;

    if !args.quiet {
        report::generate_report(format, &stats)?;
    }
    Ok(stats)
}
