//! Entries command handler

use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;

use super::EntriesCommands;
use crate::api::{ContentApi, ContentModel, Entry, ModelOperations};
use crate::cli::commands::models::handler::load_remote_models;
use crate::cli::{CommandOutcome, Role, connect};
use crate::config::Config;
use crate::config::repository::{FilterStore, SnapshotStore};
use crate::services::migration::{
    EntryMigrator, MigrationRequest, RunKind, RunReport, fetch_all,
};

pub async fn handle_entries_command(
    command: EntriesCommands,
    config: &Config,
) -> Result<CommandOutcome> {
    match command {
        EntriesCommands::Export { model, filter } => {
            export_entries(config, &model, filter.as_deref()).await
        }
        EntriesCommands::Import {
            file,
            model,
            concurrency,
        } => migrate_file(config, RunKind::Import, &file, &model, concurrency).await,
        EntriesCommands::Delete {
            file,
            model,
            concurrency,
        } => migrate_file(config, RunKind::Delete, &file, &model, concurrency).await,
        EntriesCommands::Copy {
            model,
            filter,
            concurrency,
        } => copy_entries(config, &model, filter.as_deref(), concurrency).await,
    }
}

/// Look a model up by id on `role`'s service
pub async fn find_model(
    client: &dyn ContentApi,
    role: Role,
    model_id: &str,
) -> Result<ContentModel> {
    let snapshot = load_remote_models(client, role).await?;
    snapshot.find_model(model_id).cloned().with_context(|| {
        format!(
            "Model '{}' does not exist on the {} service",
            model_id, role
        )
    })
}

pub fn load_filter(config: &Config, name: Option<&str>) -> Result<Option<Value>> {
    match name {
        Some(name) => {
            let filter = FilterStore::new(&config.filters_dir)
                .load(name)
                .with_context(|| format!("Failed to load filter '{}'", name))?;
            Ok(Some(filter))
        }
        None => Ok(None),
    }
}

/// Read every entry of `model` from the source service
pub async fn read_source_entries(
    client: &dyn ContentApi,
    config: &Config,
    model: &ContentModel,
    filter: Option<&Value>,
) -> Result<Vec<Entry>> {
    let operations = ModelOperations::build(model);
    fetch_all(client, &operations, filter, config.page_size)
        .await
        .with_context(|| format!("Failed to read '{}' entries", model.model_id))
}

pub async fn export_entries(
    config: &Config,
    model_id: &str,
    filter: Option<&str>,
) -> Result<CommandOutcome> {
    let filter = load_filter(config, filter)?;
    let client = connect(config, Role::Export)?;
    let model = find_model(&client, Role::Export, model_id).await?;
    save_source_entries(config, &client, &model, filter.as_ref()).await
}

/// Read `model`'s entries from the source and write them to the export directory
pub async fn save_source_entries(
    config: &Config,
    client: &dyn ContentApi,
    model: &ContentModel,
    filter: Option<&Value>,
) -> Result<CommandOutcome> {
    let entries = read_source_entries(client, config, model, filter).await?;

    let path = SnapshotStore::new(&config.export.to_path)
        .save_entries(&model.model_id, &entries)
        .context("Failed to write entries snapshot")?;

    println!(
        "{} Exported {} '{}' entries to {}",
        "✓".bright_green(),
        entries.len().to_string().bold(),
        model.name,
        path.display().to_string().cyan()
    );
    Ok(CommandOutcome::Success)
}

/// Load a snapshot file from the import directory
pub fn load_snapshot_entries(config: &Config, file: &str) -> Result<Vec<Entry>> {
    let store = SnapshotStore::new(&config.import.from_path);
    let entries = store.load_entries(file)?;
    log::info!("Loaded {} entries from {}", entries.len(), store.path(file).display());
    Ok(entries)
}

async fn migrate_file(
    config: &Config,
    kind: RunKind,
    file: &str,
    model_id: &str,
    concurrency: Option<usize>,
) -> Result<CommandOutcome> {
    let entries = load_snapshot_entries(config, file)?;
    let client = connect(config, Role::Import)?;
    let model = find_model(&client, Role::Import, model_id).await?;
    run_migration(config, &client, kind, model, entries, concurrency).await
}

pub async fn copy_entries(
    config: &Config,
    model_id: &str,
    filter: Option<&str>,
    concurrency: Option<usize>,
) -> Result<CommandOutcome> {
    let filter = load_filter(config, filter)?;
    let source = connect(config, Role::Export)?;
    let destination = connect(config, Role::Import)?;

    let source_model = find_model(&source, Role::Export, model_id).await?;
    let entries = read_source_entries(&source, config, &source_model, filter.as_ref()).await?;

    let model = find_model(&destination, Role::Import, model_id).await?;
    run_migration(config, &destination, RunKind::Import, model, entries, concurrency).await
}

/// Run an import or delete against the destination and print its report
pub async fn run_migration(
    config: &Config,
    client: &dyn ContentApi,
    kind: RunKind,
    model: ContentModel,
    entries: Vec<Entry>,
    concurrency: Option<usize>,
) -> Result<CommandOutcome> {
    let settings = config.migration_settings(concurrency);
    let migrator = EntryMigrator::new(client, settings);

    let report = migrator
        .run(MigrationRequest {
            operation: kind,
            model,
            entries,
        })
        .await
        .with_context(|| format!("Entry {} aborted", kind))?;

    print_report(&report);
    Ok(if report.has_errors() {
        CommandOutcome::CompletedWithErrors
    } else {
        CommandOutcome::Success
    })
}

fn print_report(report: &RunReport) {
    println!();
    if report.has_errors() {
        println!(
            "{} {} '{}' finished with errors (run {})",
            "!".bright_yellow(),
            report.kind,
            report.model_id,
            report.run_id.to_string().dimmed()
        );
    } else {
        println!(
            "{} {} '{}' completed (run {})",
            "✓".bright_green(),
            report.kind,
            report.model_id,
            report.run_id.to_string().dimmed()
        );
    }
    println!("  {}", report.summary());

    if !report.errors.is_empty() {
        println!();
        println!("{}", format!("{} errors:", report.errors.len()).bright_red().bold());
        for error in &report.errors {
            println!("  {} {}", "✗".bright_red(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationKind;
    use crate::api::mock::MockContentApi;
    use serde_json::json;

    fn models_listing() -> Value {
        json!({
            "listContentModelGroups": {"data": [{"id": "g1", "name": "Ungrouped"}]},
            "listContentModels": {"data": [{
                "modelId": "article",
                "name": "Article",
                "titleFieldId": "title",
                "fields": [{"fieldId": "title", "type": "text"}],
                "layout": [["title"]]
            }]}
        })
    }

    #[tokio::test]
    async fn test_find_model() {
        let api = MockContentApi::new().on(OperationKind::ListModels, |_, _| Ok(models_listing()));

        let model = find_model(&api, Role::Import, "article").await.unwrap();
        assert_eq!(model.name, "Article");

        let err = find_model(&api, Role::Import, "missing").await.unwrap_err();
        assert!(err.to_string().contains("'missing'"));
    }

    #[tokio::test]
    async fn test_run_migration_reports_errors() {
        let api = MockContentApi::new()
            .on(OperationKind::List, |_, _| {
                Ok(json!({"content": {
                    "data": [],
                    "meta": {"cursor": null, "hasMoreItems": false, "totalCount": 0},
                    "error": null
                }}))
            })
            .on(OperationKind::Create, |_, _| {
                Ok(json!({"content": {"data": null, "error": {"message": "Denied"}}}))
            });

        let model = find_model(
            &MockContentApi::new().on(OperationKind::ListModels, |_, _| Ok(models_listing())),
            Role::Import,
            "article",
        )
        .await
        .unwrap();
        let entries = vec![Entry::from(json!({"id": "a#0001", "title": "Hello"}))];

        let outcome = run_migration(&Config::default(), &api, RunKind::Import, model, entries, None)
            .await
            .unwrap();

        assert_eq!(outcome, CommandOutcome::CompletedWithErrors);
    }

    #[test]
    fn test_missing_snapshot_file_is_not_found() {
        let mut config = Config::default();
        config.import.from_path =
            std::env::temp_dir().join(format!("cms-migrate-{}", uuid::Uuid::new_v4()));

        let err = load_snapshot_entries(&config, "exported-entries.article.json").unwrap_err();
        let snapshot_error = err
            .downcast_ref::<crate::config::repository::SnapshotError>()
            .unwrap();
        assert!(snapshot_error.is_not_found());
    }
}
