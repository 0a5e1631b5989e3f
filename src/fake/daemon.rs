//! Fake daemon
//!
//! Implements [`DatabaseDaemon`] entirely from configured values. Nothing is
//! sent over a network. Mutating calls update the simulated [`DaemonState`];
//! `execute_admin_queries` additionally checks the [`QueryExpectations`] queue
//! and flips replication on the start/stop statements.
//!
//! Waits (`wait_for_master_position`, `wait_for_reparent_journal`) resolve
//! immediately from a comparison. Timeouts and contexts are ignored.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::config::FakeDaemonConfig;
use super::expectations::QueryExpectations;
use super::fetch::FetchResults;
use super::reparent::ReparentFixture;
use super::state::DaemonState;
use crate::connection::{AppConnectionFactory, ConnParams, DbConnection, PoolConnection, Timings};
use crate::daemon::{
    Context, DaemonConfig, DaemonError, DaemonResult, DatabaseDaemon, ReplicationStream,
};
use crate::observability::{trace_event, Event};
use crate::query::QueryResult;
use crate::replication::{
    ReplicationPosition, ReplicationStatus, START_REPLICATION_SQL, STOP_REPLICATION_SQL,
};
use crate::schema::{SchemaChange, SchemaChangeResult, SchemaDefinition};

/// Scriptable stand-in for a database daemon
pub struct FakeDaemon {
    state: DaemonState,
    closed: bool,

    /// Returned by `config`
    pub config: Option<DaemonConfig>,
    /// Returned by `listen_port`; `None` makes it fail
    pub listen_port: Option<u16>,

    /// Returned by `master_position` and in `replication_status`
    pub current_master_position: ReplicationPosition,
    /// Upstream host reported by `replication_status`
    pub current_master_host: String,
    /// Upstream port reported by `replication_status`
    pub current_master_port: u16,
    /// Returned by `demote_master`
    pub demote_master_position: ReplicationPosition,
    /// `wait_for_master_position` succeeds only for this exact position
    pub wait_master_position: ReplicationPosition,
    /// Returned by `promote_to_master`
    pub promote_result: ReplicationPosition,

    /// Returned by `schema` after filtering; `None` makes it fail
    pub schema: Option<SchemaDefinition>,
    /// Returned by `preflight_schema_change`; `None` makes it fail
    pub preflight_schema_change_result: Option<SchemaChangeResult>,
    /// Returned by `apply_schema_change`; `None` makes it fail
    pub apply_schema_change_result: Option<SchemaChangeResult>,

    /// Source of `app_connection`; `None` makes it fail
    pub app_connection_factory: Option<AppConnectionFactory>,
    /// Registry admin connections report to
    pub admin_timings: Arc<Timings>,

    /// Expected admin queries
    pub expectations: QueryExpectations,
    /// Results for `fetch_query`
    pub fetch_results: FetchResults,
    /// Reparent command inputs and outputs
    pub reparent: ReparentFixture,
}

impl Default for FakeDaemon {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDaemon {
    /// Fake daemon that appears to be running.
    pub fn new() -> Self {
        Self::with_state(DaemonState::new())
    }

    /// Fake daemon starting from `state`.
    pub fn with_state(state: DaemonState) -> Self {
        Self {
            state,
            closed: false,
            config: None,
            listen_port: None,
            current_master_position: ReplicationPosition::default(),
            current_master_host: String::new(),
            current_master_port: 0,
            demote_master_position: ReplicationPosition::default(),
            wait_master_position: ReplicationPosition::default(),
            promote_result: ReplicationPosition::default(),
            schema: None,
            preflight_schema_change_result: None,
            apply_schema_change_result: None,
            app_connection_factory: None,
            admin_timings: Arc::new(Timings::new("admin")),
            expectations: QueryExpectations::default(),
            fetch_results: FetchResults::unset(),
            reparent: ReparentFixture::default(),
        }
    }

    /// Fake daemon described by `config`.
    pub fn from_config(config: FakeDaemonConfig) -> Self {
        let state = DaemonState::new()
            .with_running(config.running)
            .with_replicating(config.replicating)
            .with_read_only(config.read_only)
            .with_binlog_playback(config.binlog_playback_enabled);

        let mut daemon = Self::with_state(state);
        daemon.config = config.daemon;
        daemon.listen_port = config.listen_port;
        daemon.current_master_position = config.current_master_position;
        daemon.current_master_host = config.current_master_host;
        daemon.current_master_port = config.current_master_port;
        daemon.demote_master_position = config.demote_master_position;
        daemon.wait_master_position = config.wait_master_position;
        daemon.promote_result = config.promote_result;
        daemon.schema = config.schema;
        daemon.preflight_schema_change_result = config.preflight_schema_change_result;
        daemon.apply_schema_change_result = config.apply_schema_change_result;
        daemon.expectations = QueryExpectations::new(config.expected_queries);
        daemon.fetch_results = match config.fetch_results {
            Some(table) => FetchResults::from_map(table),
            None => FetchResults::unset(),
        };
        daemon.reparent = ReparentFixture {
            reset_replication_result: config.reset_replication_result,
            reset_replication_error: config.reset_replication_error,
            expected_start_status: config.expected_start_status,
            start_replication_result: config.start_replication_result,
            expected_set_master_input: config.expected_set_master_input,
            set_master_result: config.set_master_result,
            expected_journal_token: config.expected_journal_token,
            master_connect_retry: Duration::from_secs(config.master_connect_retry_secs),
        };
        daemon
    }

    /// Current simulated state.
    pub fn state(&self) -> &DaemonState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fail unless every expected admin query was executed.
    pub fn check_admin_queries_consumed(&self) -> DaemonResult<()> {
        self.expectations.verify_consumed()
    }

    fn intercept(&mut self, query: &str) {
        if query == START_REPLICATION_SQL {
            self.state.set_replicating(true);
            trace_event(Event::ReplicationStarted, &[("query", query)]);
        } else if query == STOP_REPLICATION_SQL {
            self.state.set_replicating(false);
            trace_event(Event::ReplicationStopped, &[("query", query)]);
        }
    }
}

impl fmt::Debug for FakeDaemon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeDaemon")
            .field("state", &self.state)
            .field("closed", &self.closed)
            .field("expectations", &self.expectations)
            .finish_non_exhaustive()
    }
}

impl DatabaseDaemon for FakeDaemon {
    fn config(&self) -> Option<&DaemonConfig> {
        self.config.as_ref()
    }

    fn start(&mut self, _ctx: &Context) -> DaemonResult<()> {
        self.state.start()?;
        trace_event(Event::DaemonStart, &[]);
        Ok(())
    }

    fn shutdown(&mut self, _ctx: &Context, wait_for_completion: bool) -> DaemonResult<()> {
        self.state.shutdown()?;
        let wait = wait_for_completion.to_string();
        trace_event(Event::DaemonShutdown, &[("wait_for_completion", &wait)]);
        Ok(())
    }

    fn run_upgrade(&mut self) -> DaemonResult<()> {
        Ok(())
    }

    fn listen_port(&self) -> DaemonResult<u16> {
        self.listen_port
            .ok_or_else(|| DaemonError::unconfigured("no listen port defined"))
    }

    fn replication_status(&self) -> DaemonResult<ReplicationStatus> {
        Ok(ReplicationStatus {
            position: self.current_master_position.clone(),
            io_thread_running: self.state.is_replicating(),
            sql_thread_running: self.state.is_replicating(),
            master_host: self.current_master_host.clone(),
            master_port: self.current_master_port,
            master_connect_retry: self.reparent.master_connect_retry.as_secs(),
        })
    }

    fn reset_replication_commands(&self) -> DaemonResult<Vec<String>> {
        self.reparent.reset_commands()
    }

    fn start_replication_commands(&self, status: &ReplicationStatus) -> DaemonResult<Vec<String>> {
        self.reparent.start_commands(status)
    }

    fn set_master_commands(&self, host: &str, port: u16) -> DaemonResult<Vec<String>> {
        self.reparent.set_master_commands(host, port)
    }

    fn wait_for_reparent_journal(&self, _ctx: &Context, time_created_ns: i64) -> DaemonResult<()> {
        self.reparent.check_journal(time_created_ns)
    }

    fn master_position(&self) -> DaemonResult<ReplicationPosition> {
        Ok(self.current_master_position.clone())
    }

    fn demote_master(&mut self) -> DaemonResult<ReplicationPosition> {
        Ok(self.demote_master_position.clone())
    }

    fn wait_for_master_position(&self, target: &ReplicationPosition, _timeout: Duration) -> DaemonResult<()> {
        if *target != self.wait_master_position {
            return Err(DaemonError::mismatch(
                "input for wait_for_master_position",
                &self.wait_master_position,
                target,
            ));
        }
        Ok(())
    }

    fn promote_to_master(&mut self, _extra_env: &HashMap<String, String>) -> DaemonResult<ReplicationPosition> {
        Ok(self.promote_result.clone())
    }

    fn is_read_only(&self) -> DaemonResult<bool> {
        Ok(self.state.is_read_only())
    }

    fn set_read_only(&mut self, on: bool) -> DaemonResult<()> {
        self.state.set_read_only(on);
        let value = on.to_string();
        trace_event(Event::ReadOnlyChanged, &[("read_only", &value)]);
        Ok(())
    }

    fn schema(
        &self,
        _db_name: &str,
        tables: &[String],
        exclude_tables: &[String],
        include_views: bool,
    ) -> DaemonResult<SchemaDefinition> {
        let schema = self
            .schema
            .as_ref()
            .ok_or_else(|| DaemonError::unconfigured("no schema defined"))?;
        Ok(schema.filter_tables(tables, exclude_tables, include_views)?)
    }

    fn preflight_schema_change(&mut self, _db_name: &str, _change: &str) -> DaemonResult<SchemaChangeResult> {
        self.preflight_schema_change_result
            .clone()
            .ok_or_else(|| DaemonError::unconfigured("no preflight result defined"))
    }

    fn apply_schema_change(&mut self, _db_name: &str, _change: &SchemaChange) -> DaemonResult<SchemaChangeResult> {
        self.apply_schema_change_result
            .clone()
            .ok_or_else(|| DaemonError::unconfigured("no apply schema defined"))
    }

    fn execute_admin_queries(&mut self, queries: &[String]) -> DaemonResult<()> {
        for query in queries {
            self.expectations.consume(query)?;
            self.intercept(query);
        }
        Ok(())
    }

    fn fetch_query(&self, query: &str) -> DaemonResult<QueryResult> {
        self.fetch_results.fetch(query)
    }

    fn app_connection(&self) -> DaemonResult<Box<dyn PoolConnection>> {
        let factory = self
            .app_connection_factory
            .as_ref()
            .ok_or_else(|| DaemonError::unconfigured("no app connection factory set in this fake daemon"))?;
        factory()
    }

    fn admin_connection(&self) -> DaemonResult<DbConnection> {
        Ok(DbConnection::new(ConnParams::default(), Arc::clone(&self.admin_timings)))
    }

    fn replication_stream_connection(&self) -> DaemonResult<Box<dyn ReplicationStream>> {
        Err(DaemonError::unsupported("replication stream connection"))
    }

    fn enable_binlog_playback(&mut self) -> DaemonResult<()> {
        self.state.enable_binlog_playback()?;
        trace_event(Event::BinlogPlaybackEnabled, &[]);
        Ok(())
    }

    fn disable_binlog_playback(&mut self) -> DaemonResult<()> {
        self.state.disable_binlog_playback()?;
        trace_event(Event::BinlogPlaybackDisabled, &[]);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
        trace_event(Event::DaemonClosed, &[]);
    }
}
