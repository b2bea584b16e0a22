//! Command-line interface
//!
//! `models` and `entries` subcommands run one operation non-interactively;
//! `interactive` (the default) walks through the same operations with menus.

pub mod commands;
pub mod prompt;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::api::CmsClient;
use crate::config::Config;
use commands::entries::EntriesCommands;
use commands::models::ModelsCommands;

#[derive(Debug, Parser)]
#[command(name = "cms-migrate")]
#[command(version, about = "Migrate content models and entries between headless CMS instances")]
pub struct Cli {
    /// Config file (defaults to ./cms-migrate.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Content model operations
    #[command(subcommand)]
    Models(ModelsCommands),
    /// Entry operations
    #[command(subcommand)]
    Entries(EntriesCommands),
    /// Choose an operation from a menu
    Interactive,
}

/// Which configured service to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    /// Source service (`[export]`)
    Export,
    /// Destination service (`[import]`)
    Import,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Export => write!(f, "source"),
            Role::Import => write!(f, "destination"),
        }
    }
}

/// How a command ended, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    CompletedWithErrors,
}

impl CommandOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandOutcome::Success => 0,
            CommandOutcome::CompletedWithErrors => 2,
        }
    }
}

/// Build a client for the service configured under `role`
pub fn connect(config: &Config, role: Role) -> Result<CmsClient> {
    let (endpoint, api_key) = match role {
        Role::Export => {
            let export = config.require_export()?;
            (&export.manage_endpoint, &export.api_key)
        }
        Role::Import => {
            let import = config.require_import()?;
            (&import.manage_endpoint, &import.api_key)
        }
    };

    log::debug!("Connecting to {} service at {}", role, endpoint);
    CmsClient::new(endpoint.clone(), api_key, config.request_timeout())
        .with_context(|| format!("Failed to create {} client", role))
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli, config: &Config) -> Result<CommandOutcome> {
    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Models(command) => commands::models::handle_models_command(command, config).await,
        Commands::Entries(command) => {
            commands::entries::handle_entries_command(command, config).await
        }
        Commands::Interactive => commands::interactive::run_interactive(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_interactive() {
        let cli = Cli::parse_from(["cms-migrate"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_entries_import_flags() {
        let cli = Cli::parse_from([
            "cms-migrate",
            "-vv",
            "entries",
            "import",
            "--file",
            "exported-entries.article.json",
            "--model",
            "article",
            "--concurrency",
            "10",
        ]);

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Entries(EntriesCommands::Import {
                file,
                model,
                concurrency,
            })) => {
                assert_eq!(file, "exported-entries.article.json");
                assert_eq!(model, "article");
                assert_eq!(concurrency, Some(10));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_zero_concurrency_is_rejected_at_parse_time() {
        for subcommand in ["import", "delete"] {
            let err = Cli::try_parse_from([
                "cms-migrate",
                "entries",
                subcommand,
                "--file",
                "exported-entries.article.json",
                "--model",
                "article",
                "--concurrency",
                "0",
            ])
            .unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }

        let err = Cli::try_parse_from([
            "cms-migrate",
            "entries",
            "copy",
            "--model",
            "article",
            "--concurrency",
            "0",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from([
            "cms-migrate",
            "entries",
            "copy",
            "--model",
            "article",
            "--concurrency",
            "1",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Entries(EntriesCommands::Copy {
                concurrency: Some(1),
                ..
            }))
        ));
    }

    #[test]
    fn test_models_list_role() {
        let cli = Cli::parse_from(["cms-migrate", "--no-color", "models", "list", "--role", "import"]);
        assert!(cli.no_color);
        assert!(matches!(
            cli.command,
            Some(Commands::Models(ModelsCommands::List { role: Role::Import }))
        ));
    }

    #[test]
    fn test_connect_requires_endpoint() {
        let config = Config::default();
        assert!(connect(&config, Role::Export).is_err());

        let mut config = Config::default();
        config.import.manage_endpoint = "https://dest.example.com/cms/manage/en-US".to_string();
        config.import.api_key = "key".to_string();
        assert!(connect(&config, Role::Import).is_ok());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandOutcome::Success.exit_code(), 0);
        assert_eq!(CommandOutcome::CompletedWithErrors.exit_code(), 2);
    }
}
