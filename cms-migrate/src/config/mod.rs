//! Tool configuration
//!
//! Loaded from a TOML file, then overridden by environment variables (a
//! `.env` file is read in `main`). The `export` role is the source service
//! and the `import` role is the destination.

pub mod repository;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::services::migration::{DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE, MigrationSettings};

pub const LOCAL_CONFIG_FILE: &str = "cms-migrate.toml";

/// Source service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default, alias = "MANAGE_ENDPOINT")]
    pub manage_endpoint: String,
    #[serde(default, alias = "API_KEY")]
    pub api_key: String,
    /// Directory snapshots are written to
    #[serde(default = "default_data_dir", alias = "TO_PATH")]
    pub to_path: PathBuf,
}

/// Destination service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default, alias = "MANAGE_ENDPOINT")]
    pub manage_endpoint: String,
    #[serde(default, alias = "API_KEY")]
    pub api_key: String,
    /// Directory snapshots are read from
    #[serde(default = "default_data_dir", alias = "FROM_PATH")]
    pub from_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_filters_dir")]
    pub filters_dir: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_filters_dir() -> PathBuf {
    PathBuf::from("filters")
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            manage_endpoint: String::new(),
            api_key: String::new(),
            to_path: default_data_dir(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            manage_endpoint: String::new(),
            api_key: String::new(),
            from_path: default_data_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export: ExportConfig::default(),
            import: ImportConfig::default(),
            concurrency: default_concurrency(),
            page_size: default_page_size(),
            filters_dir: default_filters_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Cannot read config {}: {}", path.display(), message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Invalid config {}: {}", path.display(), message)
            }
            ConfigError::Invalid(message) => write!(f, "Invalid configuration: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// `<config dir>/cms-migrate/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cms-migrate").join("config.toml"))
}

/// Pick the config file: an explicit path, then `./cms-migrate.toml`, then the user config
fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    user_config_path().filter(|path| path.is_file())
}

impl Config {
    /// Load the config file (if any), apply environment overrides and validate
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match resolve_config_path(explicit) {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                log::debug!("No config file found, using defaults and environment");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Override values with `CMS_*` variables returned by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = non_empty("CMS_EXPORT_MANAGE_ENDPOINT") {
            self.export.manage_endpoint = value;
        }
        if let Some(value) = non_empty("CMS_EXPORT_API_KEY") {
            self.export.api_key = value;
        }
        if let Some(value) = non_empty("CMS_EXPORT_TO_PATH") {
            self.export.to_path = PathBuf::from(value);
        }
        if let Some(value) = non_empty("CMS_IMPORT_MANAGE_ENDPOINT") {
            self.import.manage_endpoint = value;
        }
        if let Some(value) = non_empty("CMS_IMPORT_API_KEY") {
            self.import.api_key = value;
        }
        if let Some(value) = non_empty("CMS_IMPORT_FROM_PATH") {
            self.import.from_path = PathBuf::from(value);
        }
        if let Some(value) = non_empty("CMS_CONCURRENCY") {
            self.concurrency = value.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("CMS_CONCURRENCY must be a number, got '{}'", value))
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Source settings, failing when no endpoint is configured
    pub fn require_export(&self) -> Result<&ExportConfig, ConfigError> {
        if self.export.manage_endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "export.manage_endpoint is not set (or CMS_EXPORT_MANAGE_ENDPOINT)".to_string(),
            ));
        }
        Ok(&self.export)
    }

    /// Destination settings, failing when no endpoint is configured
    pub fn require_import(&self) -> Result<&ImportConfig, ConfigError> {
        if self.import.manage_endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "import.manage_endpoint is not set (or CMS_IMPORT_MANAGE_ENDPOINT)".to_string(),
            ));
        }
        Ok(&self.import)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Engine settings, with an optional concurrency override from the command line
    pub fn migration_settings(&self, concurrency: Option<usize>) -> MigrationSettings {
        MigrationSettings {
            concurrency: concurrency.unwrap_or(self.concurrency),
            page_size: self.page_size,
        }
    }
}
