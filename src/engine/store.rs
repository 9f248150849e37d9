use std::collections::HashMap;
use crate::utils::{config::IdStrategy, types::Row};

/// Physical state of the engine: rows per table plus declared column names
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: HashMap<String, Vec<Row>>,
    schemas: HashMap<String, Vec<String>>,
    id_counters: HashMap<String, u64>,
}

/// Point-in-time copy of a [`TableStore`] taken when a transaction begins.
///
/// Rows are owned values, so the copy is deep: restoring it undoes inserts,
/// deletes and in-place UPDATE assignments alike.
#[derive(Debug, Clone)]
pub struct Snapshot {
    tables: HashMap<String, Vec<Row>>,
    schemas: HashMap<String, Vec<String>>,
    id_counters: HashMap<String, u64>,
}

impl TableStore {
    /// Rows of a table in storage order; a missing table reads as empty
    pub fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows_mut(&mut self, table: &str) -> Option<&mut Vec<Row>> {
        self.tables.get_mut(table)
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Register a table with no rows, replacing any rows it already had
    pub fn create_table(&mut self, table: &str, columns: Vec<String>) {
        self.tables.insert(table.to_string(), Vec::new());
        self.schemas.insert(table.to_string(), columns);
        self.id_counters.remove(table);
    }

    /// Remove a table, returning how many rows it held
    pub fn drop_table(&mut self, table: &str) -> Option<usize> {
        self.schemas.remove(table);
        self.id_counters.remove(table);
        self.tables.remove(table).map(|rows| rows.len())
    }

    pub fn schema(&self, table: &str) -> Option<&[String]> {
        self.schemas.get(table).map(Vec::as_slice)
    }

    /// Next synthetic id for an INSERT into `table`
    pub fn next_id(&mut self, table: &str, strategy: IdStrategy) -> u64 {
        let row_count = self.rows(table).len() as u64;
        match strategy {
            IdStrategy::RowCount => row_count + 1,
            IdStrategy::Monotonic => {
                let counter = self.id_counters.entry(table.to_string()).or_insert(row_count);
                *counter += 1;
                *counter
            }
        }
    }

    /// Append a row, creating the table lazily; returns the new row count
    pub fn append(&mut self, table: &str, row: Row) -> usize {
        let rows = self.tables.entry(table.to_string()).or_default();
        rows.push(row);
        rows.len()
    }

    pub fn replace_rows(&mut self, table: &str, rows: Vec<Row>) {
        self.tables.insert(table.to_string(), rows);
    }

    /// Table names in sorted order
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tables: self.tables.clone(),
            schemas: self.schemas.clone(),
            id_counters: self.id_counters.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.tables = snapshot.tables;
        self.schemas = snapshot.schemas;
        self.id_counters = snapshot.id_counters;
    }
}
