//! CLI entry point for the harvester tool.

use std::io::{self, IsTerminal};
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;
use harvester_core::config::{load_env_file, load_env_file_from};
use harvester_core::{DownloadOutcome, HarvestReport, Harvester, load_api_key};
use tracing::{debug, info, warn};

mod cli;
mod progress;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    if let Some(env_file) = &args.env_file {
        load_env_file_from(env_file)
            .with_context(|| format!("failed to load env file {}", env_file.display()))?;
    } else {
        load_env_file();
    }

    let api_key = load_api_key(&args.key_var).unwrap_or_else(|| {
        warn!(
            var = %args.key_var,
            "API key environment variable is not set; the catalog will likely reject the request"
        );
        String::new()
    });

    let quiet = args.quiet;
    let config = args.into_config(api_key);
    info!(parent_id = %config.parent_id, limit = config.limit, "harvester starting");

    let harvester = Harvester::new(config)?;

    let use_spinner = !quiet && !harvester.config().no_download && io::stderr().is_terminal();
    let (progress_handle, progress_stop) =
        progress::spawn_progress_ui(use_spinner, harvester.stats());

    let result = harvester.run().await;

    progress_stop.store(true, Ordering::SeqCst);
    if let Some(handle) = progress_handle {
        let _ = handle.await;
    }

    let report = result?;
    if !quiet {
        print_summary(&harvester, &report);
    }

    Ok(())
}

fn print_summary(harvester: &Harvester, report: &HarvestReport) {
    let config = harvester.config();

    println!("Results written to {}", report.json_out.display());

    if report.truncated {
        println!(
            "Warning: limit {} is lower than the {} records available; only the first {} were fetched.",
            config.limit,
            report.total.unwrap_or_default(),
            report.hits
        );
    }

    if report.download_skipped {
        println!(
            "Skipping download; see {} for results",
            report.json_out.display()
        );
        return;
    }

    if report.records() == 0 {
        println!("No digitized records found.");
        return;
    }
    println!("{} digitized records found.", report.records());

    println!(
        "Downloads complete: {} written, {} skipped, {} failed.",
        report.written(),
        report.skipped(),
        report.failed()
    );
    for failure in report.failures() {
        if let DownloadOutcome::Failed { url, path, reason } = failure {
            println!("  failed: {url} -> {} ({reason})", path.display());
        }
    }
}
