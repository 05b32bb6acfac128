//! CSV Batch Source - Reads a headered CSV file in fixed-size row batches

use crate::error::{IngestError, Result};
use crate::ingestion::batch::{BatchSource, RecordBatch, Value};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

pub struct CsvBatchSource {
    source_id: String,
    path: PathBuf,
    batch_size: usize,
    headers: Vec<String>,
    reader: Reader<File>,
    exhausted: bool,
}

impl CsvBatchSource {
    pub fn open(path: impl AsRef<Path>, batch_size: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = Self::build_reader(&path)?;
        let headers = normalize_headers(reader.headers()?);

        Ok(Self {
            source_id: path.display().to_string(),
            path,
            batch_size: batch_size.max(1),
            headers,
            reader,
            exhausted: false,
        })
    }

    fn build_reader(path: &Path) -> Result<Reader<File>> {
        Ok(ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?)
    }

    pub(crate) fn coerce_cell(s: &str) -> Value {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Integer(1);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Integer(0);
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }

        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Value::Real(f);
            }
        }

        Value::Text(trimmed.to_string())
    }

    fn convert_record(&self, record: &StringRecord) -> Result<Vec<Value>> {
        if record.len() != self.headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(IngestError::MalformedRow {
                file: self.source_id.clone(),
                line,
                expected: self.headers.len(),
                found: record.len(),
            });
        }
        Ok(record.iter().map(Self::coerce_cell).collect())
    }
}

/// Blank headers become `Unnamed: <idx>`; repeated headers get `.1`, `.2`, ...
fn normalize_headers(raw: &StringRecord) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.iter()
        .enumerate()
        .map(|(idx, h)| {
            let base = match h.trim() {
                "" => format!("Unnamed: {}", idx),
                trimmed => trimmed.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

impl BatchSource for CsvBatchSource {
    fn column_names(&self) -> &[String] {
        &self.headers
    }

    fn next_batch(&mut self) -> Result<Option<RecordBatch>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut batch = RecordBatch::new(self.headers.clone());
        let mut record = StringRecord::new();
        while batch.len() < self.batch_size {
            if !self.reader.read_record(&mut record)? {
                self.exhausted = true;
                break;
            }
            let row = self.convert_record(&record)?;
            batch.rows.push(row);
        }

        if batch.is_empty() {
            return Ok(None);
        }
        Ok(Some(batch))
    }

    fn rewind(&mut self) -> Result<()> {
        let mut reader = Self::build_reader(&self.path)?;
        self.headers = normalize_headers(reader.headers()?);
        self.reader = reader;
        self.exhausted = false;
        Ok(())
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn source_type(&self) -> &str {
        "csv"
    }
}
