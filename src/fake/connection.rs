//! Fake pool connection
//!
//! Answers `execute_fetch` from a [`FetchResults`] table and records every
//! statement it was asked to run, so app-connection factories in tests do not
//! need a server.

use std::sync::{Arc, Mutex};

use super::fetch::FetchResults;
use crate::connection::PoolConnection;
use crate::daemon::{DaemonError, DaemonResult};
use crate::query::QueryResult;

/// Statements seen by fake connections sharing one log.
pub type QueryLog = Arc<Mutex<Vec<String>>>;

/// Pool connection answering from canned results
#[derive(Debug)]
pub struct FakeConnection {
    results: FetchResults,
    log: QueryLog,
    closed: bool,
}

impl FakeConnection {
    pub fn new(results: FetchResults) -> Self {
        Self::with_log(results, QueryLog::default())
    }

    /// Connection appending to a log shared with other connections.
    pub fn with_log(results: FetchResults, log: QueryLog) -> Self {
        Self {
            results,
            log,
            closed: false,
        }
    }

    /// Statements executed so far on any connection sharing this log.
    pub fn executed(&self) -> Vec<String> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl PoolConnection for FakeConnection {
    fn execute_fetch(&mut self, query: &str, max_rows: usize, want_fields: bool) -> DaemonResult<QueryResult> {
        if self.closed {
            return Err(DaemonError::invalid_state("connection is closed"));
        }
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());

        let mut result = self.results.fetch(query)?;
        if result.rows.len() > max_rows {
            return Err(DaemonError::invalid_argument(format!(
                "row count {} exceeded max_rows {}",
                result.rows.len(),
                max_rows
            )));
        }
        if !want_fields {
            result.fields.clear();
        }
        Ok(result)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn recycle(self: Box<Self>) {}
}
