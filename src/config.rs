//! Pipeline configuration: CLI flags over environment over defaults

use crate::error::{IngestError, Result};
use crate::ingestion::{IngestionOptions, DEFAULT_BATCH_SIZE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_DATABASE: &str = "INVENTORY_DB";
pub const ENV_DATA_DIR: &str = "INVENTORY_DATA_DIR";
pub const ENV_LOG_DIR: &str = "INVENTORY_LOG_DIR";
pub const ENV_BATCH_SIZE: &str = "INVENTORY_BATCH_SIZE";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub database_path: PathBuf,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("inventory.db"),
            data_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("logs"),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by any `INVENTORY_*` variables present in the environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = lookup(ENV_DATABASE) {
            config.database_path = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_BATCH_SIZE) {
            config.batch_size = v.trim().parse::<usize>().map_err(|e| {
                IngestError::Config(format!("{}={:?} is not a valid batch size: {}", ENV_BATCH_SIZE, v, e))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(IngestError::Config("batch size must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn ingestion_options(&self) -> IngestionOptions {
        IngestionOptions {
            batch_size: self.batch_size,
        }
    }
}
