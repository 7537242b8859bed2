// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::PageRange;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default page range for pagination resolution
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Email harvesting behavior
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Page store location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.pagination.page_range()?;
        if self.storage.root_dir.as_os_str().is_empty() {
            return Err(AppError::validation("storage.root_dir is empty"));
        }
        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            return Err(AppError::validation(format!(
                "logging.level '{}' is not a known level",
                self.logging.level
            )));
        }
        Ok(())
    }
}

/// Page range applied when the caller does not supply one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// First page to keep (1-based)
    #[serde(default = "defaults::start_page")]
    pub start_page: u32,

    /// Last page to keep; unbounded when absent
    #[serde(default)]
    pub end_page: Option<u32>,
}

impl PaginationConfig {
    /// Build a validated page range from these settings.
    pub fn page_range(&self) -> Result<PageRange> {
        PageRange::new(self.start_page, self.end_page)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            start_page: defaults::start_page(),
            end_page: None,
        }
    }
}

/// Email harvesting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Whether speculative `first.last@domain` addresses are reported
    #[serde(default = "defaults::include_inferred")]
    pub include_inferred: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            include_inferred: defaults::include_inferred(),
        }
    }
}

/// Page store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding raw markup and extracted records
    #[serde(default = "defaults::root_dir")]
    pub root_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: defaults::root_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is not set
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn start_page() -> u32 {
        1
    }
    pub fn include_inferred() -> bool {
        true
    }
    pub fn root_dir() -> PathBuf {
        PathBuf::from("storage")
    }
    pub fn level() -> String {
        "info".into()
    }
}
