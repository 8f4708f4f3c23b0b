//! The replace-table write abstraction.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;

use retail_model::DatasetName;

use crate::error::{PersistenceError, Result};
use crate::values::{StoredColumn, stored_columns};

/// A destination that stores whole tables under a name.
///
/// `replace_table` must leave exactly the given table under `name`: any
/// previous table of that name is dropped, schema and rows alike.
pub trait TableSink {
    /// Replace the table called `name`, returning the number of rows written.
    fn replace_table(&mut self, name: &DatasetName, table: &DataFrame) -> Result<usize>;

    /// Human-readable destination for logs. Never contains credentials.
    fn describe(&self) -> String;
}

/// A table as held by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTable {
    pub columns: Vec<StoredColumn>,
    pub rows: usize,
}

impl StoredTable {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&StoredColumn> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// In-process sink with the same replace semantics as a database.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: BTreeMap<String, StoredTable>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&StoredTable> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of successful `replace_table` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TableSink for MemorySink {
    fn replace_table(&mut self, name: &DatasetName, table: &DataFrame) -> Result<usize> {
        if table.width() == 0 {
            return Err(PersistenceError::NoColumns);
        }
        let columns = stored_columns(table)?;
        let rows = table.height();
        self.tables.insert(name.to_string(), StoredTable { columns, rows });
        self.writes += 1;
        Ok(rows)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
