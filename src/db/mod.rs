//! Database module for the SQLite store
//!
//! This module provides the store handle and table lifecycle operations used by ingestion and the summary builder

pub mod store;

pub use store::{quote_ident, validate_table_name, Store};
