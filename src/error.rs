use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Invalid table identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Malformed row in {file} at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        file: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Missing column '{column}' in {source_id}")]
    MissingColumn { source_id: String, column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // Earlier batches stay committed; there is no rollback across the load.
    #[error(
        "Partial ingestion into '{table}': {batches_committed} batch(es) / {rows_committed} row(s) committed before failure: {source}"
    )]
    PartialIngestion {
        table: String,
        batches_committed: u64,
        rows_committed: u64,
        #[source]
        source: Box<IngestError>,
    },
}

impl IngestError {
    /// True when some rows of the failed load are already persisted.
    pub fn is_partial(&self) -> bool {
        matches!(self, IngestError::PartialIngestion { .. })
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
