//! Content model commands

pub mod handler;

use clap::Subcommand;

use crate::cli::Role;

pub use handler::handle_models_command;

#[derive(Debug, Subcommand)]
pub enum ModelsCommands {
    /// Save the source groups and models to exported-models.json
    Export,
    /// Print the models of a service
    List {
        /// Service to list
        #[arg(long, value_enum, default_value = "export")]
        role: Role,
    },
}
