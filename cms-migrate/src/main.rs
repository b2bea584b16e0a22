mod api;
mod cli;
mod config;
mod services;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log::LevelFilter;

use cli::{Cli, CommandOutcome};
use config::Config;
use config::repository::SnapshotError;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(error) => {
            report_error(&error);
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` takes precedence over the `-v` flags
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

async fn run(cli: Cli) -> Result<CommandOutcome> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    log::debug!(
        "Concurrency {}, page size {}, filters in {}",
        config.concurrency,
        config.page_size,
        config.filters_dir.display()
    );
    cli::run(cli, &config).await
}

fn report_error(error: &anyhow::Error) {
    match error.downcast_ref::<SnapshotError>() {
        Some(snapshot) if snapshot.is_not_found() => {
            eprintln!("{} {}", "ERROR:".bright_red().bold(), snapshot);
        }
        _ => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
        }
    }
}
