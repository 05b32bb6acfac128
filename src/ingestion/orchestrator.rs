//! Ingestion Orchestrator - create-or-truncate, then append batch by batch

use crate::db::{validate_table_name, Store};
use crate::error::{IngestError, Result};
use crate::ingestion::batch::{BatchSource, RecordBatch};
use crate::ingestion::schema_inference::SchemaInference;
use crate::ingestion::{IngestionResult, TableAction};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

/// Rows per batch when reading sources
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestionOptions {
    pub batch_size: usize,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Ingestion Orchestrator - Coordinates table lifecycle and batch appends
pub struct IngestionOrchestrator {
    schema_inference: SchemaInference,
    options: IngestionOptions,
}

impl IngestionOrchestrator {
    pub fn new() -> Self {
        Self::with_options(IngestionOptions::default())
    }

    pub fn with_options(options: IngestionOptions) -> Self {
        Self {
            schema_inference: SchemaInference::new(),
            options,
        }
    }

    pub fn options(&self) -> &IngestionOptions {
        &self.options
    }

    /// Load every batch of `source` into `table_name`.
    ///
    /// A missing table is created from the first batch's inferred schema (or the
    /// source's declared schema); an existing table is truncated first. After a
    /// successful run the table holds exactly the source's rows.
    pub fn ingest(
        &self,
        store: &mut Store,
        source: &mut dyn BatchSource,
        table_name: &str,
    ) -> Result<IngestionResult> {
        validate_table_name(table_name)?;
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let timer = Instant::now();

        let (action, mut pending) = if !store.exists(table_name)? {
            info!(
                "Table '{}' does not exist, creating it and ingesting {} source {}...",
                table_name,
                source.source_type(),
                source.source_id()
            );
            let first = source.next_batch()?;
            let columns = match source.declared_schema() {
                Some(columns) => columns,
                None => match first {
                    Some(ref batch) => self.schema_inference.infer_schema(batch),
                    None => self
                        .schema_inference
                        .infer_schema(&RecordBatch::new(source.column_names().to_vec())),
                },
            };
            store.create_table(table_name, &columns)?;
            (TableAction::Created, first)
        } else {
            info!("Truncating existing table '{}' before ingestion", table_name);
            store.truncate(table_name)?;
            (TableAction::Replaced, None)
        };

        let mut batches_committed: u64 = 0;
        let mut rows_committed: u64 = 0;

        loop {
            let next = match pending.take() {
                Some(batch) => Ok(Some(batch)),
                None => source.next_batch(),
            };

            let step = next.and_then(|maybe| match maybe {
                Some(batch) => store.append_batch(table_name, &batch).map(Some),
                None => Ok(None),
            });

            match step {
                Ok(Some(rows)) => {
                    batches_committed += 1;
                    rows_committed += rows as u64;
                }
                Ok(None) => break,
                Err(e) if batches_committed > 0 => {
                    error!(
                        "Partial ingestion into '{}': {} batch(es), {} row(s) remain committed: {}",
                        table_name, batches_committed, rows_committed, e
                    );
                    return Err(IngestError::PartialIngestion {
                        table: table_name.to_string(),
                        batches_committed,
                        rows_committed,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let elapsed_ms = timer.elapsed().as_millis() as u64;
        match action {
            TableAction::Created => info!(
                "Data ingested into newly created table '{}' ({} rows)",
                table_name, rows_committed
            ),
            TableAction::Replaced => info!(
                "Data appended into existing table '{}' ({} rows)",
                table_name, rows_committed
            ),
        }

        Ok(IngestionResult {
            run_id,
            table_name: table_name.to_string(),
            source_id: source.source_id().to_string(),
            action,
            records_ingested: rows_committed,
            batches_committed,
            started_at,
            elapsed_ms,
        })
    }
}

impl Default for IngestionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
