//! Vendor Summary - aggregate the loaded fact tables into one report table
//!
//! Pipeline: aggregation query -> derived metrics -> idempotent ingest into
//! `vendor_sales_summary`.

pub mod metrics;
pub mod query;
pub mod source;

pub use metrics::{enrich, EnrichedSummaryRow};
pub use query::{build_summary, VendorSummaryRow, VENDOR_SUMMARY_SQL};
pub use source::{SummarySource, SUMMARY_COLUMNS};

use crate::db::Store;
use crate::error::Result;
use crate::ingestion::{IngestionOrchestrator, IngestionResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Destination table for the enriched summary
pub const VENDOR_SUMMARY_TABLE: &str = "vendor_sales_summary";

/// Rows echoed to the debug log after each stage
const PREVIEW_ROWS: usize = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummaryReport {
    pub rows: usize,
    pub ingestion: IngestionResult,
    pub elapsed_ms: u64,
}

/// Build, enrich and persist the vendor summary
pub fn create_vendor_summary(
    store: &mut Store,
    orchestrator: &IngestionOrchestrator,
) -> Result<SummaryReport> {
    let timer = Instant::now();

    info!("Creating Vendor Summary Table .....");
    let summary = build_summary(store)?;
    for row in summary.iter().take(PREVIEW_ROWS) {
        debug!("{:?}", row);
    }

    info!("Cleaning Data .....");
    let enriched = enrich(summary)?;
    for row in enriched.iter().take(PREVIEW_ROWS) {
        debug!("{:?}", row);
    }

    info!("Ingesting data .....");
    let rows = enriched.len();
    let mut source = SummarySource::new(enriched, orchestrator.options().batch_size);
    let ingestion = orchestrator.ingest(store, &mut source, VENDOR_SUMMARY_TABLE)?;

    let elapsed_ms = timer.elapsed().as_millis() as u64;
    info!("----------Summary Complete----------");
    info!("Total Time Taken: {:.2} minutes", elapsed_ms as f64 / 60_000.0);

    Ok(SummaryReport {
        rows,
        ingestion,
        elapsed_ms,
    })
}
