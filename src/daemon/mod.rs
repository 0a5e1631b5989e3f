//! Daemon Control Interface
//!
//! `DatabaseDaemon` is everything orchestration code may do to a database
//! server taking part in master/replica replication. Orchestration depends on
//! the trait only, so a real server and the fake daemon are interchangeable.
//!
//! Command generation is separate from command execution: the `*_commands`
//! methods return the statements that would reconfigure replication, and the
//! caller runs them through `execute_admin_queries` when it is ready.
//!
//! Neither `demote_master` nor `promote_to_master` touches the read-only
//! flag. Only `set_read_only` changes it.

mod config;
mod context;
mod errors;

pub use config::DaemonConfig;
pub use context::Context;
pub use errors::{DaemonError, DaemonErrorKind, DaemonResult};

use std::collections::HashMap;
use std::time::Duration;

use crate::connection::{DbConnection, PoolConnection};
use crate::query::QueryResult;
use crate::replication::{ReplicationPosition, ReplicationStatus};
use crate::schema::{SchemaChange, SchemaChangeResult, SchemaDefinition};

/// Live stream of replication events from a daemon
pub trait ReplicationStream: std::fmt::Debug {
    /// Position of the last event read.
    fn position(&self) -> &ReplicationPosition;

    /// Stop streaming and release the connection.
    fn close(&mut self);
}

/// Operations every database daemon supports
pub trait DatabaseDaemon {
    /// Configuration the daemon runs with, if one is attached.
    fn config(&self) -> Option<&DaemonConfig>;

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Start the daemon. Fails if it is already running.
    fn start(&mut self, ctx: &Context) -> DaemonResult<()>;

    /// Stop the daemon. Fails if it is not running.
    fn shutdown(&mut self, ctx: &Context, wait_for_completion: bool) -> DaemonResult<()>;

    /// Upgrade the system tables after a binary upgrade.
    fn run_upgrade(&mut self) -> DaemonResult<()>;

    /// Port the daemon listens on.
    fn listen_port(&self) -> DaemonResult<u16>;

    // =========================================================================
    // REPLICATION
    // =========================================================================

    /// Fresh snapshot of the replication threads and upstream.
    fn replication_status(&self) -> DaemonResult<ReplicationStatus>;

    /// Statements that wipe all replication configuration.
    fn reset_replication_commands(&self) -> DaemonResult<Vec<String>>;

    /// Statements that configure and start replication from `status`.
    ///
    /// Implementations may override `status.master_connect_retry`.
    fn start_replication_commands(&self, status: &ReplicationStatus) -> DaemonResult<Vec<String>>;

    /// Statements that point replication at `host:port`.
    fn set_master_commands(&self, host: &str, port: u16) -> DaemonResult<Vec<String>>;

    /// Wait until the reparent journal row `time_created_ns` is visible.
    fn wait_for_reparent_journal(&self, ctx: &Context, time_created_ns: i64) -> DaemonResult<()>;

    // =========================================================================
    // POSITION & PROMOTION
    // =========================================================================

    /// Current position of this daemon's binlog.
    fn master_position(&self) -> DaemonResult<ReplicationPosition>;

    /// Wait for in-flight transactions and return the resulting position.
    fn demote_master(&mut self) -> DaemonResult<ReplicationPosition>;

    /// Wait until the applied position equals `target`, up to `timeout`.
    fn wait_for_master_position(&self, target: &ReplicationPosition, timeout: Duration) -> DaemonResult<()>;

    /// Turn this replica into a master and return its position.
    ///
    /// `extra_env` is passed to any promotion hook.
    fn promote_to_master(&mut self, extra_env: &HashMap<String, String>) -> DaemonResult<ReplicationPosition>;

    // =========================================================================
    // READ-ONLY
    // =========================================================================

    fn is_read_only(&self) -> DaemonResult<bool>;

    fn set_read_only(&mut self, on: bool) -> DaemonResult<()>;

    // =========================================================================
    // SCHEMA
    // =========================================================================

    /// Schema of `db_name` restricted by the table filters.
    fn schema(
        &self,
        db_name: &str,
        tables: &[String],
        exclude_tables: &[String],
        include_views: bool,
    ) -> DaemonResult<SchemaDefinition>;

    /// Estimate the effect of `change` without applying it.
    fn preflight_schema_change(&mut self, db_name: &str, change: &str) -> DaemonResult<SchemaChangeResult>;

    /// Apply `change`.
    fn apply_schema_change(&mut self, db_name: &str, change: &SchemaChange) -> DaemonResult<SchemaChangeResult>;

    // =========================================================================
    // QUERIES & CONNECTIONS
    // =========================================================================

    /// Run statements that return no rows, in order, stopping at the first error.
    fn execute_admin_queries(&mut self, queries: &[String]) -> DaemonResult<()>;

    /// Run one statement that returns rows.
    fn fetch_query(&self, query: &str) -> DaemonResult<QueryResult>;

    fn app_connection(&self) -> DaemonResult<Box<dyn PoolConnection>>;

    fn admin_connection(&self) -> DaemonResult<DbConnection>;

    /// Open a stream of replication events.
    fn replication_stream_connection(&self) -> DaemonResult<Box<dyn ReplicationStream>>;

    // =========================================================================
    // BINLOG PLAYBACK
    // =========================================================================

    /// Fails if playback is already enabled.
    fn enable_binlog_playback(&mut self) -> DaemonResult<()>;

    /// Fails if playback is already disabled.
    fn disable_binlog_playback(&mut self) -> DaemonResult<()>;

    /// Release all resources. Does not wait on admin queries beyond those
    /// already in flight.
    fn close(&mut self);
}
