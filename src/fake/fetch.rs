//! Canned results for fetch queries
//!
//! Lookups are by exact query text, repeatable, and never consume anything.

use std::collections::HashMap;

use crate::daemon::{DaemonError, DaemonResult};
use crate::query::QueryResult;

/// Query text → result table. `None` means no table was configured at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResults {
    table: Option<HashMap<String, QueryResult>>,
}

impl FetchResults {
    /// No table configured; every fetch fails.
    pub fn unset() -> Self {
        Self { table: None }
    }

    /// Configured table with the given entries.
    pub fn from_map(table: HashMap<String, QueryResult>) -> Self {
        Self { table: Some(table) }
    }

    /// Add or replace the result for `query`, configuring the table if needed.
    pub fn insert(&mut self, query: impl Into<String>, result: QueryResult) {
        self.table
            .get_or_insert_with(HashMap::new)
            .insert(query.into(), result);
    }

    pub fn is_configured(&self) -> bool {
        self.table.is_some()
    }

    /// Result configured for `query`.
    pub fn fetch(&self, query: &str) -> DaemonResult<QueryResult> {
        self.table
            .as_ref()
            .and_then(|table| table.get(query))
            .cloned()
            .ok_or_else(|| DaemonError::unconfigured(format!("unexpected query: {}", query)))
    }
}
