pub mod config;
pub mod db;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod summary;

pub use config::PipelineConfig;
pub use db::Store;
pub use error::{IngestError, Result};
pub use ingestion::{
    load_directory, BatchSource, CsvBatchSource, IngestionOptions, IngestionOrchestrator,
    IngestionResult, LoadReport, RecordBatch, TableAction, Value,
};
pub use summary::{create_vendor_summary, SummaryReport, VENDOR_SUMMARY_TABLE};
