//! Connection handles
//!
//! `PoolConnection` is what an application connection pool hands out. The
//! admin `DbConnection` is a dedicated handle that carries its parameters and
//! the timing registry it reports to. Neither performs I/O in this crate.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::params::ConnParams;
use super::timings::Timings;
use crate::daemon::DaemonResult;
use crate::query::QueryResult;

/// Connection borrowed from an application pool
pub trait PoolConnection: Send + fmt::Debug {
    /// Run one statement and return at most `max_rows` rows.
    fn execute_fetch(&mut self, query: &str, max_rows: usize, want_fields: bool) -> DaemonResult<QueryResult>;

    /// Whether the connection was closed and must not be reused.
    fn is_closed(&self) -> bool;

    /// Close the underlying connection.
    fn close(&mut self);

    /// Give the connection back to its pool.
    fn recycle(self: Box<Self>);
}

/// Produces application connections on demand
pub type AppConnectionFactory = Box<dyn Fn() -> DaemonResult<Box<dyn PoolConnection>>>;

/// Administrative connection handle
#[derive(Debug)]
pub struct DbConnection {
    params: ConnParams,
    timings: Arc<Timings>,
    closed: bool,
}

impl DbConnection {
    pub fn new(params: ConnParams, timings: Arc<Timings>) -> Self {
        Self {
            params,
            timings,
            closed: false,
        }
    }

    pub fn params(&self) -> &ConnParams {
        &self.params
    }

    pub fn timings(&self) -> &Arc<Timings> {
        &self.timings
    }

    /// Report a finished operation to the shared registry.
    pub fn record(&self, operation: &str, elapsed: Duration) {
        self.timings.record(operation, elapsed);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        self.closed = true;
    }
}
