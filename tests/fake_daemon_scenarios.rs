//! Fake Daemon Scenario Tests
//!
//! Orchestration-style flows driven through `&mut dyn DatabaseDaemon`:
//! - Lifecycle and binlog playback guards
//! - Reparent input validation
//! - Position waits and promotion
//! - Canned fetches and connections
//! - Unsupported operations versus failed assertions

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use aerodb_ctl::connection::{PoolConnection, Timings};
use aerodb_ctl::daemon::{Context, DaemonConfig, DaemonErrorKind, DaemonResult, DatabaseDaemon};
use aerodb_ctl::fake::{
    DaemonState, FakeConnection, FakeDaemon, FetchResults, QueryExpectations, QueryLog, ReparentFixture,
};
use aerodb_ctl::query::{Field, QueryResult};
use aerodb_ctl::replication::sql::read_reparent_journal;
use aerodb_ctl::replication::{ReplicationPosition, ReplicationStatus};
use aerodb_ctl::schema::{SchemaChange, SchemaChangeResult, SchemaDefinition, TableDefinition};
use uuid::Uuid;

/// Point a replica at a new master and restart replication, the way a
/// reparent workflow does.
fn reparent_replica(daemon: &mut dyn DatabaseDaemon, host: &str, port: u16) -> DaemonResult<()> {
    let mut commands = vec!["STOP SLAVE".to_string()];
    commands.extend(daemon.set_master_commands(host, port)?);
    commands.push("START SLAVE".to_string());
    daemon.execute_admin_queries(&commands)
}

fn status(host: &str, port: u16) -> ReplicationStatus {
    ReplicationStatus {
        master_host: host.into(),
        master_port: port,
        ..Default::default()
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// A running daemon refuses a second start.
#[test]
fn test_start_while_running_fails() {
    let mut daemon = FakeDaemon::new();
    let err = daemon.start(&Context::background()).unwrap_err();
    assert_eq!(err.kind, DaemonErrorKind::InvalidState);
    assert!(daemon.state().is_running());
}

/// Shutdown then start succeeds; a second shutdown fails.
#[test]
fn test_shutdown_start_cycle() {
    let mut daemon = FakeDaemon::new();
    let ctx = Context::with_timeout(Duration::from_secs(5));

    daemon.shutdown(&ctx, true).unwrap();
    assert!(!daemon.state().is_running());
    assert!(daemon.shutdown(&ctx, true).is_err());

    daemon.start(&ctx).unwrap();
    assert!(daemon.state().is_running());
}

/// A daemon constructed stopped can be started once.
#[test]
fn test_start_from_stopped_state() {
    let mut daemon = FakeDaemon::with_state(DaemonState::new().with_running(false));
    daemon.start(&Context::background()).unwrap();
    assert!(daemon.start(&Context::background()).is_err());
}

/// Enabling or disabling playback into its current state fails.
#[test]
fn test_binlog_playback_guard_is_symmetric() {
    let mut daemon = FakeDaemon::new();

    assert_eq!(
        daemon.disable_binlog_playback().unwrap_err().kind,
        DaemonErrorKind::InvalidState
    );
    daemon.enable_binlog_playback().unwrap();
    assert!(daemon.enable_binlog_playback().is_err());
    daemon.disable_binlog_playback().unwrap();
    assert!(!daemon.state().is_binlog_playback_enabled());
}

// =============================================================================
// Reparenting
// =============================================================================

/// The whole reparent flow passes when inputs and queries line up.
#[test]
fn test_reparent_flow() {
    let mut daemon = FakeDaemon::new();
    daemon.reparent = ReparentFixture {
        expected_set_master_input: Some("db2:3306".into()),
        set_master_result: vec!["CHANGE MASTER TO MASTER_HOST='db2', MASTER_PORT=3306".into()],
        ..Default::default()
    };
    daemon.expectations = QueryExpectations::parse(["STOP SLAVE", "SUBCHANGE MASTER TO", "START SLAVE"]);

    reparent_replica(&mut daemon, "db2", 3306).unwrap();

    assert!(daemon.replication_status().unwrap().is_replicating());
    daemon.check_admin_queries_consumed().unwrap();
}

/// A wrong upstream is caught before any statement runs.
#[test]
fn test_reparent_to_wrong_master_fails() {
    let mut daemon = FakeDaemon::new();
    daemon.reparent.expected_set_master_input = Some("db2:3306".into());
    daemon.expectations = QueryExpectations::parse(["STOP SLAVE"]);

    let err = reparent_replica(&mut daemon, "db3", 3306).unwrap_err();
    assert!(err.is_assertion_failure());
    assert!(err.message.contains("expected db2:3306"));
    assert!(err.message.contains("got db3:3306"));
    assert_eq!(daemon.expectations.consumed(), 0);
}

/// The configured retry interval replaces the caller's before comparison.
#[test]
fn test_start_replication_retry_override() {
    let mut daemon = FakeDaemon::new();
    daemon.reparent.master_connect_retry = Duration::from_secs(30);
    daemon.reparent.expected_start_status = Some(ReplicationStatus {
        master_connect_retry: 30,
        ..status("db1", 3306)
    });
    daemon.reparent.start_replication_result = vec!["START SLAVE".into()];

    let mut input = status("db1", 3306);
    input.master_connect_retry = 1;
    assert_eq!(daemon.start_replication_commands(&input).unwrap(), vec!["START SLAVE"]);

    // Reported back as the forced value.
    assert_eq!(daemon.replication_status().unwrap().master_connect_retry, 30);
}

/// Reset commands return the canned list or the scripted error.
#[test]
fn test_reset_replication_commands() {
    let mut daemon = FakeDaemon::new();
    daemon.reparent.reset_replication_result = vec!["STOP SLAVE".into(), "RESET SLAVE ALL".into()];
    assert_eq!(daemon.reset_replication_commands().unwrap().len(), 2);

    daemon.reparent.reset_replication_error = Some("disk full".into());
    let err = daemon.reset_replication_commands().unwrap_err();
    assert_eq!(err.kind, DaemonErrorKind::Injected);
    assert_eq!(err.message, "disk full");
}

/// The journal wait checks the token when one is expected.
#[test]
fn test_wait_for_reparent_journal() {
    let mut daemon = FakeDaemon::new();
    let ctx = Context::background();
    daemon.wait_for_reparent_journal(&ctx, 7).unwrap();

    daemon.reparent.expected_journal_token = Some(8);
    assert!(daemon.wait_for_reparent_journal(&ctx, 7).is_err());
    daemon.wait_for_reparent_journal(&ctx, 8).unwrap();
}

// =============================================================================
// Positions & Promotion
// =============================================================================

/// Only the exact configured position satisfies the wait.
#[test]
fn test_wait_for_master_position_exact_match() {
    let server = Uuid::new_v4();
    let mut daemon = FakeDaemon::new();
    daemon.wait_master_position = ReplicationPosition::single(server, 100);

    daemon
        .wait_for_master_position(&ReplicationPosition::single(server, 100), Duration::from_millis(1))
        .unwrap();

    // A later position is not "reached" either.
    let err = daemon
        .wait_for_master_position(&ReplicationPosition::single(server, 101), Duration::from_secs(60))
        .unwrap_err();
    assert_eq!(err.kind, DaemonErrorKind::Mismatch);
}

/// Demote and promote return the canned positions and leave read-only alone.
#[test]
fn test_demote_and_promote() {
    let server = Uuid::new_v4();
    let mut daemon = FakeDaemon::new();
    daemon.demote_master_position = ReplicationPosition::single(server, 10);
    daemon.promote_result = ReplicationPosition::single(server, 11);
    daemon.set_read_only(true).unwrap();

    assert_eq!(daemon.demote_master().unwrap().sequence(&server), 10);
    assert!(daemon.is_read_only().unwrap());

    let mut env = HashMap::new();
    env.insert("REPARENT_REASON".to_string(), "test".to_string());
    assert_eq!(daemon.promote_to_master(&env).unwrap().sequence(&server), 11);
    assert!(daemon.is_read_only().unwrap());
}

/// Replication status reflects the configured upstream and position.
#[test]
fn test_replication_status_snapshot() {
    let server = Uuid::new_v4();
    let mut daemon = FakeDaemon::with_state(DaemonState::new().with_replicating(true));
    daemon.current_master_host = "db1".into();
    daemon.current_master_port = 3307;
    daemon.current_master_position = ReplicationPosition::single(server, 5);

    let status = daemon.replication_status().unwrap();
    assert!(status.io_thread_running && status.sql_thread_running);
    assert_eq!(status.master_addr(), "db1:3307");
    assert_eq!(status.master_connect_retry, 10);
    assert_eq!(daemon.master_position().unwrap(), status.position);
}

// =============================================================================
// Queries & Connections
// =============================================================================

/// The same fetch returns the same result every time.
#[test]
fn test_fetch_is_repeatable() {
    let query = read_reparent_journal(42);
    let result = QueryResult::with_rows(
        vec![Field::new("action_name", "VARBINARY")],
        vec![vec![Some("PlannedReparent".into())]],
    );

    let mut daemon = FakeDaemon::new();
    daemon.fetch_results.insert(query.clone(), result.clone());

    assert_eq!(daemon.fetch_query(&query).unwrap(), result);
    assert_eq!(daemon.fetch_query(&query).unwrap(), result);
    assert_eq!(daemon.fetch_query(&query).unwrap().value(0, "action_name"), Some("PlannedReparent"));
}

/// Fetching without a table, or an unknown query, fails as unconfigured.
#[test]
fn test_fetch_unconfigured() {
    let mut daemon = FakeDaemon::new();
    assert_eq!(daemon.fetch_query("SELECT 1").unwrap_err().kind, DaemonErrorKind::Unconfigured);

    daemon.fetch_results = FetchResults::from_map(HashMap::new());
    let err = daemon.fetch_query("SELECT 1").unwrap_err();
    assert!(err.message.contains("unexpected query: SELECT 1"));
}

/// App connections come from the factory and share its log.
#[test]
fn test_app_connections_from_factory() {
    let log = QueryLog::default();
    let mut results = FetchResults::default();
    results.insert("SELECT 1", QueryResult::with_rows(Vec::new(), vec![vec![Some("1".into())]]));

    let mut daemon = FakeDaemon::new();
    let factory_log = Arc::clone(&log);
    daemon.app_connection_factory = Some(Box::new(move || {
        Ok(Box::new(FakeConnection::with_log(results.clone(), Arc::clone(&factory_log))) as Box<dyn PoolConnection>)
    }));

    let mut a = daemon.app_connection().unwrap();
    let mut b = daemon.app_connection().unwrap();
    a.execute_fetch("SELECT 1", 10, false).unwrap();
    b.execute_fetch("SELECT 1", 10, false).unwrap();
    a.recycle();

    assert_eq!(log.lock().unwrap().len(), 2);
}

/// Admin connections report to the daemon's timing registry.
#[test]
fn test_admin_connection_timings() {
    let mut daemon = FakeDaemon::new();
    daemon.admin_timings = Arc::new(Timings::new("mysqld-admin"));

    let conn = daemon.admin_connection().unwrap();
    conn.record("Exec", Duration::from_millis(2));
    conn.record("Exec", Duration::from_millis(3));

    let stat = daemon.admin_timings.stat("Exec");
    assert_eq!(stat.count, 2);
    assert_eq!(stat.total, Duration::from_millis(5));
    assert_eq!(conn.timings().name(), "mysqld-admin");
}

// =============================================================================
// Schema
// =============================================================================

/// Schema filters apply to the configured definition.
#[test]
fn test_schema_filtering() {
    let mut daemon = FakeDaemon::new();
    daemon.schema = Some(SchemaDefinition::new(
        "CREATE DATABASE app",
        vec![
            TableDefinition::base_table("users", "CREATE TABLE users (id INT)"),
            TableDefinition::base_table("users_archive", "CREATE TABLE users_archive (id INT)"),
            TableDefinition::view("active_users", "CREATE VIEW active_users AS SELECT id FROM users"),
        ],
    ));

    let tables = vec!["users.*".to_string()];
    let exclude = vec!["users_archive".to_string()];
    let schema = daemon.schema("app", &tables, &exclude, true).unwrap();
    assert_eq!(schema.table_names(), vec!["users"]);

    let bad = vec!["(".to_string()];
    let err = daemon.schema("app", &bad, &[], true).unwrap_err();
    assert_eq!(err.kind, DaemonErrorKind::InvalidArgument);
}

/// Schema changes return the canned results.
#[test]
fn test_schema_change_results() {
    let before = SchemaDefinition::new("CREATE DATABASE app", Vec::new());
    let after = SchemaDefinition::new(
        "CREATE DATABASE app",
        vec![TableDefinition::base_table("t", "CREATE TABLE t (a INT)")],
    );
    let result = SchemaChangeResult {
        before_schema: before,
        after_schema: after,
    };

    let mut daemon = FakeDaemon::new();
    daemon.preflight_schema_change_result = Some(result.clone());
    daemon.apply_schema_change_result = Some(result.clone());

    let change = SchemaChange::new("CREATE TABLE t (a INT)");
    assert_eq!(daemon.preflight_schema_change("app", &change.sql).unwrap(), result);
    let applied = daemon.apply_schema_change("app", &change).unwrap();
    assert!(!applied.is_noop());
}

// =============================================================================
// Unsupported Operations
// =============================================================================

/// Unsupported operations are not assertion failures.
#[test]
fn test_unsupported_is_distinguishable() {
    let mut daemon = FakeDaemon::new();
    daemon.config = Some(DaemonConfig::new(101, "/var/lib/mysql"));
    assert_eq!(daemon.config().map(|c| c.server_id), Some(101));

    let err = daemon.replication_stream_connection().unwrap_err();
    assert_eq!(err.kind, DaemonErrorKind::Unsupported);
    assert!(!err.is_assertion_failure());

    daemon.run_upgrade().unwrap();
    daemon.close();
    assert!(daemon.is_closed());
}
