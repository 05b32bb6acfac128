//! SQLite store handle - table lifecycle (exists / create / truncate / append)
//!
//! The store is constructed explicitly and passed to every operation; there is
//! no process-wide connection.

use crate::error::{IngestError, Result};
use crate::ingestion::batch::{Column, ColumnType, RecordBatch, Value};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::debug;

lazy_static! {
    static ref TABLE_IDENT: Regex = Regex::new(r"^[A-Za-z0-9_]{1,128}$").unwrap();
}

// SQLite resolves table names case-insensitively; the lookup matches that.
const TABLE_LOOKUP_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE";

/// Reject table names outside the identifier allow-list before they reach any SQL.
pub fn validate_table_name(name: &str) -> Result<&str> {
    if TABLE_IDENT.is_match(name) {
        Ok(name)
    } else {
        Err(IngestError::InvalidIdentifier(name.to_string()))
    }
}

/// Double-quote an identifier, doubling any embedded quote.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        debug!("Opened store at {}", path.display());
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error SQLite reports on close
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| IngestError::Database(e))
    }

    /// Check whether a table exists.
    ///
    /// "Not found" is `Ok(false)`; only query/connection failures are errors.
    pub fn exists(&self, name: &str) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                TABLE_LOOKUP_SQL,
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Remove all rows from an existing table in one committed transaction
    pub fn truncate(&mut self, name: &str) -> Result<()> {
        let name = validate_table_name(name)?;
        let tx = self.conn.transaction()?;
        let exists: Option<String> = tx
            .query_row(
                TABLE_LOOKUP_SQL,
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(IngestError::TableNotFound(name.to_string()));
        }

        let deleted = tx.execute(&format!("DELETE FROM {}", quote_ident(name)), [])?;
        tx.commit()?;
        debug!("Truncated {} ({} rows removed)", name, deleted);
        Ok(())
    }

    pub fn create_table(&self, name: &str, columns: &[Column]) -> Result<()> {
        let name = validate_table_name(name)?;
        let ddl = format!(
            "CREATE TABLE {} ({})",
            quote_ident(name),
            columns
                .iter()
                .map(|c| format!("{} {}", quote_ident(&c.name), c.data_type.sql_name()))
                .join(", ")
        );
        debug!("{}", ddl);
        self.conn.execute(&ddl, [])?;
        Ok(())
    }

    /// Append one batch inside its own transaction; returns rows written
    pub fn append_batch(&mut self, name: &str, batch: &RecordBatch) -> Result<usize> {
        let name = validate_table_name(name)?;
        if batch.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(name),
            batch.column_names.iter().map(|c| quote_ident(c)).join(", "),
            (1..=batch.column_names.len()).map(|i| format!("?{}", i)).join(", ")
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in &batch.rows {
                stmt.execute(params_from_iter(row.iter().map(SqlValue::from)))?;
            }
        }
        tx.commit()?;
        Ok(batch.len())
    }

    pub fn row_count(&self, name: &str) -> Result<u64> {
        let name = validate_table_name(name)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(name)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Declared columns of a table, in ordinal order
    pub fn table_columns(&self, name: &str) -> Result<Vec<Column>> {
        let name = validate_table_name(name)?;
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(name)))?;
        let columns = stmt
            .query_map([], |row| {
                let col_name: String = row.get(1)?;
                let decl: String = row.get(2)?;
                Ok(Column::new(col_name, ColumnType::from_declared(&decl)))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if columns.is_empty() {
            return Err(IngestError::TableNotFound(name.to_string()));
        }
        Ok(columns)
    }

    /// Run a read query and return every row as cells
    pub fn query_rows(&self, sql: &str) -> Result<RecordBatch> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = column_names.len();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                let v: SqlValue = row.get(idx)?;
                cells.push(Value::from(v));
            }
            out.push(cells);
        }

        Ok(RecordBatch::with_rows(column_names, out))
    }
}
