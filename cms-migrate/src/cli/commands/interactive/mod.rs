//! Menu-driven mode
//!
//! Same operations as the `models` and `entries` subcommands, with the model,
//! filter and snapshot file picked from lists.

use anyhow::Result;

use crate::api::{CmsClient, ContentModel};
use crate::cli::commands::entries::handler::{
    load_filter, load_snapshot_entries, read_source_entries, run_migration, save_source_entries,
};
use crate::cli::commands::models::handler::{export_models, list_models, load_remote_models};
use crate::cli::prompt::{select, select_optional};
use crate::cli::{CommandOutcome, Role, connect};
use crate::config::Config;
use crate::config::repository::{FilterStore, SnapshotStore};
use crate::services::migration::RunKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    ExportModels,
    ListModels,
    ExportEntries,
    ImportEntries,
    DeleteEntries,
    CopyEntries,
}

impl Mode {
    const ALL: [Mode; 6] = [
        Mode::ExportModels,
        Mode::ListModels,
        Mode::ExportEntries,
        Mode::ImportEntries,
        Mode::DeleteEntries,
        Mode::CopyEntries,
    ];
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Mode::ExportModels => "Export models to local file",
            Mode::ListModels => "List models of a service",
            Mode::ExportEntries => "Export entries to local file",
            Mode::ImportEntries => "Import entries from a local file",
            Mode::DeleteEntries => "Delete entries specified in a local file",
            Mode::CopyEntries => "Copy entries from one system to another",
        };
        write!(f, "{}", label)
    }
}

pub async fn run_interactive(config: &Config) -> Result<CommandOutcome> {
    let mode = Mode::ALL[select("What do you want to do?", &Mode::ALL)?];
    log::debug!("Interactive mode: {:?}", mode);

    match mode {
        Mode::ExportModels => export_models(config).await,
        Mode::ListModels => {
            let roles = [Role::Export, Role::Import];
            let role = roles[select("Which service?", &roles)?];
            list_models(config, role).await
        }
        Mode::ExportEntries => {
            let client = connect(config, Role::Export)?;
            let model = pick_model(&client, Role::Export, "Which entries would you like to export?").await?;
            let filter = pick_filter(config)?;
            save_source_entries(config, &client, &model, filter.as_ref()).await
        }
        Mode::ImportEntries => {
            let file = pick_snapshot_file(config, "Which file would you like to import?")?;
            migrate_file(config, RunKind::Import, &file).await
        }
        Mode::DeleteEntries => {
            let file = pick_snapshot_file(
                config,
                "Which file has the ids of the entries you want to delete?",
            )?;
            migrate_file(config, RunKind::Delete, &file).await
        }
        Mode::CopyEntries => {
            let source = connect(config, Role::Export)?;
            let destination = connect(config, Role::Import)?;
            let source_model = pick_model(&source, Role::Export, "Which entries would you like to copy?").await?;
            let filter = pick_filter(config)?;
            let entries = read_source_entries(&source, config, &source_model, filter.as_ref()).await?;
            let model = pick_model(&destination, Role::Import, "Into which model?").await?;
            run_migration(config, &destination, RunKind::Import, model, entries, None).await
        }
    }
}

async fn migrate_file(config: &Config, kind: RunKind, file: &str) -> Result<CommandOutcome> {
    let entries = load_snapshot_entries(config, file)?;
    let client = connect(config, Role::Import)?;
    let model = pick_model(&client, Role::Import, "Which model?").await?;
    run_migration(config, &client, kind, model, entries, None).await
}

async fn pick_model(client: &CmsClient, role: Role, prompt: &str) -> Result<ContentModel> {
    let snapshot = load_remote_models(client, role).await?;
    let models = snapshot.models();
    let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
    let choice = select(prompt, &names)?;
    Ok(models[choice].clone())
}

fn pick_filter(config: &Config) -> Result<Option<serde_json::Value>> {
    let filters = FilterStore::new(&config.filters_dir).list()?;
    let choice = select_optional("Which filter would you like to apply?", &filters)?;
    load_filter(config, choice.map(|index| filters[index].as_str()))
}

fn pick_snapshot_file(config: &Config, prompt: &str) -> Result<String> {
    let store = SnapshotStore::new(&config.import.from_path);
    let files = store.list_entry_files()?;
    if files.is_empty() {
        anyhow::bail!("No entry snapshots found in {}", store.dir().display());
    }
    let choice = select(prompt, &files)?;
    Ok(files[choice].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lists_every_mode_once() {
        let labels: Vec<String> = Mode::ALL.iter().map(ToString::to_string).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), Mode::ALL.len());
        assert_eq!(labels[0], "Export models to local file");
    }
}
