mod cli;
mod config;
mod progress;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use engine_logging::{engine_error, engine_info};
use kb_harvester_core::HarvestSummary;
use kb_harvester_engine::{Harvester, ReqwestFetcher};

use crate::cli::Cli;
use crate::config::RunConfig;
use crate::progress::LogProgressSink;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match RunConfig::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            // Logger is not up yet.
            eprintln!("Error: {err:#}");
            return ExitCode::from(2);
        }
    };

    engine_logging::initialize(config.log_level(), config.log_file.as_deref());

    match run(&config) {
        Ok(summary) => {
            engine_info!(
                "{} of {} page(s) written, {} skipped",
                summary.written_count(),
                summary.discovered,
                summary.skipped_count()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            engine_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &RunConfig) -> Result<HarvestSummary> {
    engine_info!(
        "Harvesting {} listing page(s) in {} mode into {}",
        config.listing_urls.len(),
        config.mode,
        config.output.display()
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let fetcher =
        Arc::new(ReqwestFetcher::new(config.fetch_settings()).context("failed to build HTTP client")?);
    let harvester = Harvester::new(config.harvest_settings(Utc::now().to_rfc3339()), fetcher);

    runtime
        .block_on(harvester.run(&LogProgressSink))
        .context("harvest aborted")
}
