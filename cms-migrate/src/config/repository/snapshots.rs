//! Repository for JSON snapshot files
//!
//! `exported-models.json` holds the models snapshot and
//! `exported-entries.<modelId>.json` a flat array of entries.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{Entry, ModelsSnapshot};

pub const MODELS_FILE: &str = "exported-models.json";
const ENTRIES_PREFIX: &str = "exported-entries.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    NotFound { path: PathBuf },
    Io { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
}

impl SnapshotError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapshotError::NotFound { .. })
    }

    fn io(path: &Path, error: std::io::Error) -> Self {
        if error.kind() == ErrorKind::NotFound {
            SnapshotError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SnapshotError::Io {
                path: path.to_path_buf(),
                message: error.to_string(),
            }
        }
    }
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::NotFound { path } => {
                write!(f, "Snapshot file not found: {}", path.display())
            }
            SnapshotError::Io { path, message } => {
                write!(f, "Cannot access {}: {}", path.display(), message)
            }
            SnapshotError::Parse { path, message } => {
                write!(f, "Invalid JSON in {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

/// File name of the entries snapshot for `model_id`
pub fn entries_file(model_id: &str) -> String {
    format!("{}{}.json", ENTRIES_PREFIX, model_id)
}

/// Named JSON documents in one directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T, SnapshotError> {
        let path = self.path(name);
        let content = std::fs::read_to_string(&path).map_err(|e| SnapshotError::io(&path, e))?;
        serde_json::from_str(&content).map_err(|e| SnapshotError::Parse {
            path,
            message: e.to_string(),
        })
    }

    /// Write `value` as pretty JSON, creating the directory when needed
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, SnapshotError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| SnapshotError::io(&self.dir, e))?;

        let path = self.path(name);
        let content = serde_json::to_string_pretty(value).map_err(|e| SnapshotError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| SnapshotError::io(&path, e))?;

        log::debug!("Saved snapshot {}", path.display());
        Ok(path)
    }

    /// Names of the `.json` files in the directory, sorted; empty when it does not exist
    pub fn list(&self) -> Result<Vec<String>, SnapshotError> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotError::io(&self.dir, e)),
        };

        let mut names = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| SnapshotError::io(&self.dir, e))?;
            let name = item.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") && item.path().is_file() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn list_entry_files(&self) -> Result<Vec<String>, SnapshotError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|name| name.starts_with(ENTRIES_PREFIX))
            .collect())
    }

    pub fn save_models(&self, snapshot: &ModelsSnapshot) -> Result<PathBuf, SnapshotError> {
        self.save(MODELS_FILE, snapshot)
    }

    pub fn load_entries(&self, name: &str) -> Result<Vec<Entry>, SnapshotError> {
        self.load(name)
    }

    pub fn save_entries(&self, model_id: &str, entries: &[Entry]) -> Result<PathBuf, SnapshotError> {
        self.save(&entries_file(model_id), &entries)
    }
}
