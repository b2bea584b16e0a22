//! Repository layer for files on disk

pub mod filters;
pub mod snapshots;

pub use filters::FilterStore;
pub use snapshots::{MODELS_FILE, SnapshotError, SnapshotStore, entries_file};
