//! Ingestion Module - CSV files into store tables
//!
//! Handles loading tabular sources into the store with:
//! - Bounded-size batch reads
//! - Schema inference on first write
//! - Truncate-then-append on rerun (idempotent loads)

pub mod batch;
pub mod csv_source;
pub mod directory;
pub mod orchestrator;
pub mod schema_inference;

pub use batch::{BatchSource, Column, ColumnType, RecordBatch, Value};
pub use csv_source::CsvBatchSource;
pub use directory::{load_directory, LoadReport};
pub use orchestrator::{IngestionOptions, IngestionOrchestrator, DEFAULT_BATCH_SIZE};
pub use schema_inference::SchemaInference;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the loader did to the destination table
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableAction {
    /// Table did not exist and was created from the first batch
    Created,
    /// Table existed; prior rows were truncated before appending
    Replaced,
}

/// Ingestion result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestionResult {
    /// Ingestion run ID
    pub run_id: String,

    /// Destination table
    pub table_name: String,

    /// Source the rows came from
    pub source_id: String,

    pub action: TableAction,

    /// Number of records ingested
    pub records_ingested: u64,

    pub batches_committed: u64,

    pub started_at: DateTime<Utc>,

    pub elapsed_ms: u64,
}
