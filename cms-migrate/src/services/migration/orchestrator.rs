//! Drives one import or delete run from start to report

use log::{debug, info, warn};
use serde_json::{Value, json};
use uuid::Uuid;

use super::aggregator::{ErrorAggregator, Stage, UnitFailure};
use super::batch::{BatchError, BatchExecutor, UnitResult};
use super::reader::{DEFAULT_PAGE_SIZE, fetch_all};
use super::reconcile::{DestinationIndex, Reconciliation, classify, entry_identity};
use super::report::{RunKind, RunReport, UnitOutcome};
use crate::api::{
    ApiError, ContentApi, ContentModel, Entry, ModelOperations, OperationCache, content_data,
};

pub const DEFAULT_CONCURRENCY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationSettings {
    pub concurrency: usize,
    pub page_size: u32,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Input of one run
#[derive(Debug, Clone)]
pub struct MigrationRequest {
    pub operation: RunKind,
    pub model: ContentModel,
    pub entries: Vec<Entry>,
}

/// Failures that stop a run before any unit executes
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationError {
    InvalidSettings(BatchError),
    DestinationSnapshot(ApiError),
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::InvalidSettings(error) => write!(f, "{}", error),
            MigrationError::DestinationSnapshot(error) => {
                write!(f, "Failed to read destination entries: {}", error)
            }
        }
    }
}

impl std::error::Error for MigrationError {}

/// State shared by every unit of one run
#[derive(Debug)]
pub struct RunContext {
    pub run_id: Uuid,
    pub errors: ErrorAggregator,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            errors: ErrorAggregator::new(),
        }
    }
}

struct ImportPlan {
    label: String,
    action: Reconciliation,
    publish: bool,
    input: Value,
}

impl ImportPlan {
    fn stage(&self) -> Stage {
        match self.action {
            Reconciliation::Create => Stage::Create,
            Reconciliation::Revise { .. } => Stage::Revise,
        }
    }

    /// Outcome of the create/revise step alone
    fn written(&self, published: bool) -> UnitOutcome {
        match self.action {
            Reconciliation::Create => UnitOutcome::Created { published },
            Reconciliation::Revise { .. } => UnitOutcome::Revised { published },
        }
    }
}

struct DeletePlan {
    label: String,
    identity: String,
}

fn entry_label(entry: &Entry, model: &ContentModel, position: usize) -> String {
    entry
        .label(model)
        .unwrap_or_else(|| format!("entry {}", position + 1))
}

fn revision_id(data: &Value) -> Result<String, ApiError> {
    data.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::malformed("mutation returned no revision id"))
}

/// Imports or deletes the entries of a model against a destination service
pub struct EntryMigrator<'a> {
    client: &'a dyn ContentApi,
    operations: OperationCache,
    settings: MigrationSettings,
}

impl<'a> EntryMigrator<'a> {
    pub fn new(client: &'a dyn ContentApi, settings: MigrationSettings) -> Self {
        Self {
            client,
            operations: OperationCache::new(),
            settings,
        }
    }

    pub async fn run(&self, request: MigrationRequest) -> Result<RunReport, MigrationError> {
        let executor =
            BatchExecutor::new(self.settings.concurrency).map_err(MigrationError::InvalidSettings)?;
        let context = RunContext::new();
        let operations = self.operations.get_or_build(&request.model);

        info!(
            "[{}] Starting {} of {} '{}' entries (concurrency {})",
            context.run_id,
            request.operation,
            request.entries.len(),
            request.model.model_id,
            executor.concurrency()
        );

        let report = match request.operation {
            RunKind::Import => {
                self.import(&context, &executor, &request.model, &operations, &request.entries)
                    .await?
            }
            RunKind::Delete => {
                self.delete(&context, &executor, &request.model, &operations, &request.entries)
                    .await
            }
        };

        debug!("[{}] {:?}", context.run_id, executor.stats());
        let report = report.finish(context.errors.drain());
        info!("[{}] Finished {}", context.run_id, report.summary());
        Ok(report)
    }

    pub async fn import(
        &self,
        context: &RunContext,
        executor: &BatchExecutor,
        model: &ContentModel,
        operations: &ModelOperations,
        entries: &[Entry],
    ) -> Result<RunReport, MigrationError> {
        info!(
            "[{}] Reading destination entries of '{}'",
            context.run_id, model.model_id
        );
        let existing = fetch_all(self.client, operations, None, self.settings.page_size)
            .await
            .map_err(MigrationError::DestinationSnapshot)?;
        let index = DestinationIndex::from_entries(&existing);
        info!(
            "[{}] Destination holds {} entries",
            context.run_id,
            index.len()
        );

        let plans: Vec<ImportPlan> = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| ImportPlan {
                label: entry_label(entry, model, position),
                action: classify(entry, &index),
                publish: entry.is_published(),
                input: entry.to_input(),
            })
            .collect();

        let units: Vec<_> = plans
            .iter()
            .map(|plan| move || self.import_unit(context, operations, plan))
            .collect();
        let results = executor.run(units).await;

        let mut report = RunReport::new(context.run_id, RunKind::Import, &model.model_id, plans.len());
        for (plan, result) in plans.iter().zip(results) {
            match result {
                UnitResult::Succeeded(outcome) => report.record(outcome),
                UnitResult::Failed(stage) => {
                    if stage == Stage::Publish {
                        report.record(plan.written(false));
                    }
                    report.failed += 1;
                }
                UnitResult::Panicked(message) => {
                    context
                        .errors
                        .append(UnitFailure::panicked(&plan.label, plan.stage(), message));
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Create or revise one entry, then publish it when the source was published
    ///
    /// Errors are recorded in the run context; the returned stage tells the
    /// caller where the unit stopped.
    async fn import_unit(
        &self,
        context: &RunContext,
        operations: &ModelOperations,
        plan: &ImportPlan,
    ) -> Result<UnitOutcome, Stage> {
        let stage = plan.stage();
        let (operation, variables) = match &plan.action {
            Reconciliation::Create => (&operations.create, json!({ "data": plan.input })),
            Reconciliation::Revise { revision } => (
                &operations.create_revision,
                json!({ "revision": revision, "data": plan.input }),
            ),
        };
        debug!(
            "[{}] {} '{}'",
            context.run_id,
            operation.name(),
            plan.label
        );

        let written = self
            .client
            .request(operation, variables)
            .await
            .and_then(content_data)
            .and_then(|data| revision_id(&data));
        let revision = match written {
            Ok(revision) => revision,
            Err(error) => {
                context
                    .errors
                    .append(UnitFailure::api(&plan.label, stage, error));
                return Err(stage);
            }
        };

        if !plan.publish {
            return Ok(plan.written(false));
        }

        debug!("[{}] Publishing '{}' ({})", context.run_id, plan.label, revision);
        match self
            .client
            .request(&operations.publish, json!({ "revision": revision }))
            .await
            .and_then(content_data)
        {
            Ok(_) => Ok(plan.written(true)),
            Err(error) => {
                context
                    .errors
                    .append(UnitFailure::api(&plan.label, Stage::Publish, error));
                Err(Stage::Publish)
            }
        }
    }

    pub async fn delete(
        &self,
        context: &RunContext,
        executor: &BatchExecutor,
        model: &ContentModel,
        operations: &ModelOperations,
        entries: &[Entry],
    ) -> RunReport {
        let plans: Vec<DeletePlan> = entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                let id = entry.id()?;
                Some(DeletePlan {
                    label: entry_label(entry, model, position),
                    identity: entry_identity(id).to_string(),
                })
            })
            .collect();

        let mut report = RunReport::new(context.run_id, RunKind::Delete, &model.model_id, entries.len());
        report.skipped = entries.len() - plans.len();
        if report.skipped > 0 {
            warn!(
                "[{}] Skipping {} entries without an id",
                context.run_id, report.skipped
            );
        }

        let units: Vec<_> = plans
            .iter()
            .map(|plan| move || self.delete_unit(context, operations, plan))
            .collect();
        let results = executor.run(units).await;

        for (plan, result) in plans.iter().zip(results) {
            match result {
                UnitResult::Succeeded(outcome) => report.record(outcome),
                UnitResult::Failed(_) => report.failed += 1,
                UnitResult::Panicked(message) => {
                    context
                        .errors
                        .append(UnitFailure::panicked(&plan.label, Stage::Delete, message));
                    report.failed += 1;
                }
            }
        }

        report
    }

    async fn delete_unit(
        &self,
        context: &RunContext,
        operations: &ModelOperations,
        plan: &DeletePlan,
    ) -> Result<UnitOutcome, Stage> {
        debug!("[{}] Deleting '{}'", context.run_id, plan.label);
        match self
            .client
            .request(&operations.delete, json!({ "revision": plan.identity }))
            .await
            .and_then(content_data)
        {
            Ok(_) => Ok(UnitOutcome::Deleted),
            Err(error) => {
                context
                    .errors
                    .append(UnitFailure::api(&plan.label, Stage::Delete, error));
                Err(Stage::Delete)
            }
        }
    }
}
