//! Schema Inference - Deterministic column typing from the first record batch

use crate::ingestion::batch::{Column, ColumnType, RecordBatch, Value};
use serde::{Deserialize, Serialize};

/// Per-column observation gathered while scanning a batch
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct ColumnStats {
    integers: usize,
    reals: usize,
    texts: usize,
    nulls: usize,
}

impl ColumnStats {
    fn observe(&mut self, value: &Value) {
        match value {
            Value::Null => self.nulls += 1,
            Value::Integer(_) => self.integers += 1,
            Value::Real(_) => self.reals += 1,
            Value::Text(_) => self.texts += 1,
        }
    }

    fn resolve(&self) -> ColumnType {
        if self.texts > 0 {
            return ColumnType::Text;
        }
        if self.reals > 0 || self.nulls > 0 {
            // Integers with gaps widen to REAL, and all-null columns are REAL too.
            return ColumnType::Real;
        }
        if self.integers > 0 {
            return ColumnType::Integer;
        }
        ColumnType::Text
    }
}

/// Schema Inference Engine
pub struct SchemaInference;

impl SchemaInference {
    pub fn new() -> Self {
        Self
    }

    /// Infer the destination schema from a batch's columns and values.
    ///
    /// A batch with no rows yields TEXT for every column.
    pub fn infer_schema(&self, batch: &RecordBatch) -> Vec<Column> {
        let mut stats = vec![ColumnStats::default(); batch.column_names.len()];
        for row in &batch.rows {
            for (idx, value) in row.iter().enumerate() {
                if let Some(s) = stats.get_mut(idx) {
                    s.observe(value);
                }
            }
        }

        batch
            .column_names
            .iter()
            .zip(stats.iter())
            .map(|(name, s)| Column::new(name.clone(), s.resolve()))
            .collect()
    }
}

impl Default for SchemaInference {
    fn default() -> Self {
        Self::new()
    }
}
