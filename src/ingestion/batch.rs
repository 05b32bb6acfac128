//! Record batches and the batch source trait - the unit of work for ingestion

use crate::error::Result;
use rusqlite::types::Value as SqlValue;
use serde::{Deserialize, Serialize};

/// A single cell, mirroring SQLite's storage classes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the cell; numeric-looking text is parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl From<SqlValue> for Value {
    fn from(v: SqlValue) -> Self {
        match v {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(i) => Value::Integer(i),
            SqlValue::Real(f) => Value::Real(f),
            SqlValue::Text(s) => Value::Text(s),
            SqlValue::Blob(b) => Value::Text(String::from_utf8_lossy(&b).into_owned()),
        }
    }
}

impl From<&Value> for SqlValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => SqlValue::Null,
            Value::Integer(i) => SqlValue::Integer(*i),
            // SQLite has no representation for NaN/inf that round-trips; store NULL.
            Value::Real(f) if !f.is_finite() => SqlValue::Null,
            Value::Real(f) => SqlValue::Real(*f),
            Value::Text(s) => SqlValue::Text(s.clone()),
        }
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map(Value::Real).unwrap_or(Value::Null)
    }
}

/// Declared column type used in CREATE TABLE
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn sql_name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    /// Maps a declared SQLite type back onto a column type using SQLite's affinity rules.
    pub fn from_declared(decl: &str) -> Self {
        let upper = decl.to_ascii_uppercase();
        if upper.contains("INT") {
            ColumnType::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            ColumnType::Text
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            ColumnType::Real
        } else {
            ColumnType::Text
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A bounded group of rows over a fixed set of named columns.
///
/// Every row holds exactly `column_names.len()` cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordBatch {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RecordBatch {
    pub fn new(column_names: Vec<String>) -> Self {
        Self {
            column_names,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(column_names: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { column_names, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matched case-insensitively like SQLite identifiers
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }
}

/// A finite, restartable sequence of record batches.
///
/// Implementations:
/// - CsvBatchSource: chunked reads from a CSV file
/// - SummarySource: enriched vendor summary rows held in memory
pub trait BatchSource {
    /// Column names every batch carries, available before the first batch is read
    fn column_names(&self) -> &[String];

    /// Explicit schema, when the source knows its column types up front.
    /// Returns None to let the loader infer types from the first batch.
    fn declared_schema(&self) -> Option<Vec<Column>> {
        None
    }

    /// Next batch, or None once the sequence is exhausted
    fn next_batch(&mut self) -> Result<Option<RecordBatch>>;

    /// Restart the sequence from the first batch
    fn rewind(&mut self) -> Result<()>;

    /// Unique identifier of the source (file path, logical name)
    fn source_id(&self) -> &str;

    /// Source type (e.g., "csv", "memory")
    fn source_type(&self) -> &str;
}
