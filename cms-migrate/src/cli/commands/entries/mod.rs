//! Entry commands

pub mod handler;

use clap::Subcommand;

pub use handler::handle_entries_command;

/// `--concurrency` must be a positive integer
fn parse_concurrency(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Debug, Subcommand)]
pub enum EntriesCommands {
    /// Save every entry of a source model to exported-entries.<model>.json
    Export {
        /// Model id on the source service
        #[arg(long)]
        model: String,
        /// Filter file in the filters directory, sent as `where`
        #[arg(long)]
        filter: Option<String>,
    },
    /// Create or revise destination entries from a snapshot file
    Import {
        /// Snapshot file in the import directory
        #[arg(long)]
        file: String,
        /// Model id on the destination service
        #[arg(long)]
        model: String,
        /// Units of work run at the same time
        #[arg(long, value_parser = parse_concurrency)]
        concurrency: Option<usize>,
    },
    /// Delete the destination entries listed in a snapshot file
    Delete {
        /// Snapshot file in the import directory
        #[arg(long)]
        file: String,
        /// Model id on the destination service
        #[arg(long)]
        model: String,
        /// Units of work run at the same time
        #[arg(long, value_parser = parse_concurrency)]
        concurrency: Option<usize>,
    },
    /// Read entries from the source and import them into the destination
    Copy {
        /// Model id, identical on both services
        #[arg(long)]
        model: String,
        /// Filter file in the filters directory, sent as `where`
        #[arg(long)]
        filter: Option<String>,
        /// Units of work run at the same time
        #[arg(long, value_parser = parse_concurrency)]
        concurrency: Option<usize>,
    },
}
