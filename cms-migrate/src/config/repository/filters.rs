//! Repository for entry filter files
//!
//! A filter is any JSON value; it is sent unmodified as the `where` argument
//! of list queries.

use std::path::PathBuf;

use serde_json::Value;

use super::snapshots::{SnapshotError, SnapshotStore};

#[derive(Debug, Clone)]
pub struct FilterStore {
    files: SnapshotStore,
}

impl FilterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            files: SnapshotStore::new(dir),
        }
    }

    pub fn list(&self) -> Result<Vec<String>, SnapshotError> {
        self.files.list()
    }

    /// Load a filter by file name; the `.json` extension may be left out
    pub fn load(&self, name: &str) -> Result<Value, SnapshotError> {
        if name.ends_with(".json") {
            self.files.load(name)
        } else {
            self.files.load(&format!("{}.json", name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_with_or_without_extension() {
        let dir = std::env::temp_dir().join(format!("cms-migrate-filters-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("recent.json"), r#"{"savedOn_gte": "2024-01-01"}"#).unwrap();

        let filters = FilterStore::new(&dir);
        assert_eq!(filters.list().unwrap(), vec!["recent.json"]);
        assert_eq!(
            filters.load("recent").unwrap(),
            json!({"savedOn_gte": "2024-01-01"})
        );
        assert_eq!(filters.load("recent.json").unwrap(), filters.load("recent").unwrap());
        assert!(filters.load("missing").unwrap_err().is_not_found());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
