// src/report/session.rs
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tracing::debug;

use crate::engine::ReportRow;

/// A named result set cached for reuse within a session.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedTable {
    pub name: String,
    pub rows: Vec<ReportRow>,
}

/// Holds materialized tables for the lifetime of one batch of reports.
/// The table map sits behind a mutex so reports running on different
/// threads can share one session.
#[derive(Debug, Default)]
pub struct Session {
    tables: Mutex<HashMap<String, Arc<MaterializedTable>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `rows` under `name`, dropping any table already using it.
    pub fn materialize(&self, name: &str, rows: Vec<ReportRow>) -> Arc<MaterializedTable> {
        let table = Arc::new(MaterializedTable {
            name: name.to_string(),
            rows,
        });
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        if tables.insert(name.to_string(), Arc::clone(&table)).is_some() {
            debug!(table = name, "replaced materialized table");
        }
        debug!(table = name, rows = table.rows.len(), "materialized");
        table
    }

    pub fn table(&self, name: &str) -> Option<Arc<MaterializedTable>> {
        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materializing_twice_replaces_the_table() {
        let session = Session::new();
        session.materialize("t", vec![ReportRow::new().with("x", 1i64)]);
        session.materialize(
            "t",
            vec![
                ReportRow::new().with("x", 2i64),
                ReportRow::new().with("x", 3i64),
            ],
        );

        let t = session.table("t").expect("table exists");
        assert_eq!(t.rows.len(), 2);
        assert_eq!(session.table_names(), vec!["t".to_string()]);
    }

}
