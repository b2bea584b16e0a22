//! Models command handler

use anyhow::{Context, Result};
use colored::*;

use super::ModelsCommands;
use crate::api::{ContentApi, ModelsSnapshot, fetch_models};
use crate::cli::{CommandOutcome, Role, connect};
use crate::config::Config;
use crate::config::repository::SnapshotStore;

pub async fn handle_models_command(
    command: ModelsCommands,
    config: &Config,
) -> Result<CommandOutcome> {
    match command {
        ModelsCommands::Export => export_models(config).await,
        ModelsCommands::List { role } => list_models(config, role).await,
    }
}

/// Fetch the models of `role`'s service
pub async fn load_remote_models(client: &dyn ContentApi, role: Role) -> Result<ModelsSnapshot> {
    let snapshot = fetch_models(client)
        .await
        .with_context(|| format!("Failed to list content models of the {} service", role))?;
    log::info!(
        "Found {} models in {} groups on the {} service",
        snapshot.models().len(),
        snapshot.list_content_model_groups.data.len(),
        role
    );
    Ok(snapshot)
}

/// Save the source service's groups and models to the export directory
pub async fn export_models(config: &Config) -> Result<CommandOutcome> {
    let client = connect(config, Role::Export)?;
    let snapshot = load_remote_models(&client, Role::Export).await?;

    let store = SnapshotStore::new(&config.export.to_path);
    let path = store
        .save_models(&snapshot)
        .context("Failed to write models snapshot")?;

    println!(
        "{} Exported {} models to {}",
        "✓".bright_green(),
        snapshot.models().len().to_string().bold(),
        path.display().to_string().cyan()
    );
    Ok(CommandOutcome::Success)
}

pub async fn list_models(config: &Config, role: Role) -> Result<CommandOutcome> {
    let client = connect(config, role)?;
    let snapshot = load_remote_models(&client, role).await?;

    if snapshot.models().is_empty() {
        println!("No models found on the {} service", role);
        return Ok(CommandOutcome::Success);
    }

    println!("Models on the {} service:", role.to_string().bold());
    println!();
    for model in snapshot.models() {
        let group = model
            .group
            .as_ref()
            .map(|g| g.id.as_str())
            .unwrap_or("-");
        println!(
            "  {} {} ({} fields, group {})",
            model.model_id.bright_cyan(),
            model.name,
            model.fields.len(),
            group.dimmed()
        );
    }
    Ok(CommandOutcome::Success)
}
