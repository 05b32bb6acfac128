//! Directory loader - every `*.csv` in a folder becomes a table named after the file

use crate::db::Store;
use crate::error::Result;
use crate::ingestion::{CsvBatchSource, IngestionOrchestrator, IngestionResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoadReport {
    pub files: Vec<IngestionResult>,
    pub elapsed_ms: u64,
}

impl LoadReport {
    pub fn total_rows(&self) -> u64 {
        self.files.iter().map(|f| f.records_ingested).sum()
    }
}

/// CSV files directly inside `dir`, sorted by file name
pub fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(".csv"))
                .unwrap_or(false);
        if is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Table name for a CSV file: the file name minus its `.csv` extension
pub fn table_name_for(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(".csv"))
        .map(str::to_string)
}

/// Ingest every CSV in `dir`. Stops at the first failing file.
pub fn load_directory(
    store: &mut Store,
    orchestrator: &IngestionOrchestrator,
    dir: &Path,
) -> Result<LoadReport> {
    let timer = Instant::now();
    info!("----------Ingestion Started----------");

    let mut report = LoadReport::default();
    for path in csv_files(dir)? {
        let file_name = path.display().to_string();
        let Some(table_name) = table_name_for(&path) else {
            continue;
        };

        info!("Ingesting {} into DB table \"{}\"", file_name, table_name);
        let mut source = CsvBatchSource::open(&path, orchestrator.options().batch_size)?;
        let result = orchestrator.ingest(store, &mut source, &table_name)?;
        info!(
            "Ingested {} into DB table \"{}\" ({} rows)",
            file_name, table_name, result.records_ingested
        );
        report.files.push(result);
    }

    report.elapsed_ms = timer.elapsed().as_millis() as u64;
    info!(
        "----------Ingestion Complete---------- ({} files, {} rows)",
        report.files.len(),
        report.total_rows()
    );
    info!(
        "Total Time Taken: {:.2} minutes",
        report.elapsed_ms as f64 / 60_000.0
    );
    Ok(report)
}
