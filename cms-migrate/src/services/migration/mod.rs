// Entry migration service
//
// Reads entries page by page, reconciles them against the destination and
// runs the resulting mutations in bounded groups. Failures of single entries
// are collected per run instead of aborting it.

pub mod aggregator;
pub mod batch;
pub mod orchestrator;
pub mod reader;
pub mod reconcile;
pub mod report;

// Re-export commonly used types
pub use aggregator::{ErrorAggregator, FailureCause, Stage, UnitFailure};
pub use batch::{BatchError, BatchExecutor, UnitResult};
pub use orchestrator::{
    DEFAULT_CONCURRENCY, EntryMigrator, MigrationError, MigrationRequest, MigrationSettings,
};
pub use reader::{DEFAULT_PAGE_SIZE, fetch_all};
pub use reconcile::{DestinationIndex, Reconciliation, classify, entry_identity};
pub use report::{RunKind, RunReport, RunStatus};
