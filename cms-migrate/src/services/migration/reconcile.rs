//! Matching source entries against what already exists at the destination

use std::collections::HashMap;

use crate::api::Entry;
use crate::api::models::REVISION_SEPARATOR;

/// What to do with one source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No destination entry shares the identity
    Create,
    /// Add a new revision derived from the existing destination revision
    Revise { revision: String },
}

/// Stable part of a composite entry id: everything before the first `#`,
/// or the whole id when there is no separator
pub fn entry_identity(id: &str) -> &str {
    id.split_once(REVISION_SEPARATOR)
        .map(|(identity, _)| identity)
        .unwrap_or(id)
}

/// Destination entries keyed by identity
#[derive(Debug, Clone, Default)]
pub struct DestinationIndex {
    revisions: HashMap<String, String>,
}

impl DestinationIndex {
    /// Index destination entries; when two share an identity the first one wins
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut revisions = HashMap::with_capacity(entries.len());

        for entry in entries {
            let Some(id) = entry.id() else {
                continue;
            };
            let identity = entry.entry_id().unwrap_or_else(|| entry_identity(id));
            revisions
                .entry(identity.to_string())
                .or_insert_with(|| id.to_string());
        }

        Self { revisions }
    }

    /// Full destination id for `identity`, used as the base revision
    pub fn revision_for(&self, identity: &str) -> Option<&str> {
        self.revisions.get(identity).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }
}

/// Decide whether `entry` is created fresh or revised from a destination entry
pub fn classify(entry: &Entry, index: &DestinationIndex) -> Reconciliation {
    let Some(id) = entry.id() else {
        return Reconciliation::Create;
    };

    match index.revision_for(entry_identity(id)) {
        Some(revision) => Reconciliation::Revise {
            revision: revision.to_string(),
        },
        None => Reconciliation::Create,
    }
}
