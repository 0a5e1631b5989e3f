//! Fake daemon configuration
//!
//! Serializable description of a fake daemon: initial state plus every canned
//! result and expected input. Fixture files embed one of these.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::expectations::ExpectedQuery;
use super::reparent::DEFAULT_MASTER_CONNECT_RETRY;
use crate::daemon::DaemonConfig;
use crate::query::QueryResult;
use crate::replication::{ReplicationPosition, ReplicationStatus};
use crate::schema::{SchemaChangeResult, SchemaDefinition};

fn default_running() -> bool {
    true
}

fn default_master_connect_retry_secs() -> u64 {
    DEFAULT_MASTER_CONNECT_RETRY.as_secs()
}

/// Everything a fake daemon is constructed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FakeDaemonConfig {
    // --- Initial state ---
    /// Daemon starts out running (default: true)
    #[serde(default = "default_running")]
    pub running: bool,
    #[serde(default)]
    pub replicating: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub binlog_playback_enabled: bool,

    // --- Identity ---
    #[serde(default)]
    pub daemon: Option<DaemonConfig>,
    /// Port reported by `listen_port`; unset makes it fail
    #[serde(default)]
    pub listen_port: Option<u16>,

    // --- Replication ---
    #[serde(default)]
    pub current_master_position: ReplicationPosition,
    #[serde(default)]
    pub current_master_host: String,
    #[serde(default)]
    pub current_master_port: u16,
    #[serde(default)]
    pub demote_master_position: ReplicationPosition,
    #[serde(default)]
    pub wait_master_position: ReplicationPosition,
    #[serde(default)]
    pub promote_result: ReplicationPosition,

    // --- Reparent commands ---
    /// Forced reconnect interval in seconds (default: 10)
    #[serde(default = "default_master_connect_retry_secs")]
    pub master_connect_retry_secs: u64,
    #[serde(default)]
    pub reset_replication_result: Vec<String>,
    #[serde(default)]
    pub reset_replication_error: Option<String>,
    #[serde(default)]
    pub expected_start_status: Option<ReplicationStatus>,
    #[serde(default)]
    pub start_replication_result: Vec<String>,
    #[serde(default)]
    pub expected_set_master_input: Option<String>,
    #[serde(default)]
    pub set_master_result: Vec<String>,
    #[serde(default)]
    pub expected_journal_token: Option<i64>,

    // --- Schema ---
    #[serde(default)]
    pub schema: Option<SchemaDefinition>,
    #[serde(default)]
    pub preflight_schema_change_result: Option<SchemaChangeResult>,
    #[serde(default)]
    pub apply_schema_change_result: Option<SchemaChangeResult>,

    // --- Queries ---
    /// Admin queries in expected order; `SUB` prefix marks a prefix match
    #[serde(default)]
    pub expected_queries: Vec<ExpectedQuery>,
    /// Fetch results by exact query; unset makes every fetch fail
    #[serde(default)]
    pub fetch_results: Option<HashMap<String, QueryResult>>,
}

impl Default for FakeDaemonConfig {
    fn default() -> Self {
        Self {
            running: default_running(),
            replicating: false,
            read_only: false,
            binlog_playback_enabled: false,
            daemon: None,
            listen_port: None,
            current_master_position: ReplicationPosition::default(),
            current_master_host: String::new(),
            current_master_port: 0,
            demote_master_position: ReplicationPosition::default(),
            wait_master_position: ReplicationPosition::default(),
            promote_result: ReplicationPosition::default(),
            master_connect_retry_secs: default_master_connect_retry_secs(),
            reset_replication_result: Vec::new(),
            reset_replication_error: None,
            expected_start_status: None,
            start_replication_result: Vec::new(),
            expected_set_master_input: None,
            set_master_result: Vec::new(),
            expected_journal_token: None,
            schema: None,
            preflight_schema_change_result: None,
            apply_schema_change_result: None,
            expected_queries: Vec::new(),
            fetch_results: None,
        }
    }
}
