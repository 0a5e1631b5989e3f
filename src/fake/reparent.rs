//! Reparent command fixtures
//!
//! Each command generator checks the caller's input against the configured
//! expected input before returning its canned statements, so a test can
//! assert both what was requested and with which parameters.

use std::time::Duration;

use crate::daemon::{DaemonError, DaemonResult};
use crate::replication::ReplicationStatus;

/// Reconnect interval a production daemon forces on every replica.
pub const DEFAULT_MASTER_CONNECT_RETRY: Duration = Duration::from_secs(10);

/// Expected inputs and canned outputs of the reparent command generators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReparentFixture {
    /// Returned by `reset_replication_commands`
    pub reset_replication_result: Vec<String>,
    /// When set, `reset_replication_commands` fails with this message
    pub reset_replication_error: Option<String>,

    /// Input `start_replication_commands` must receive (after the retry
    /// interval is normalized)
    pub expected_start_status: Option<ReplicationStatus>,
    /// Returned by `start_replication_commands`
    pub start_replication_result: Vec<String>,

    /// `host:port` `set_master_commands` must receive
    pub expected_set_master_input: Option<String>,
    /// Returned by `set_master_commands`
    pub set_master_result: Vec<String>,

    /// Journal token `wait_for_reparent_journal` must receive; any token is
    /// accepted when unset
    pub expected_journal_token: Option<i64>,

    /// Value written over the caller's `master_connect_retry`
    pub master_connect_retry: Duration,
}

impl Default for ReparentFixture {
    fn default() -> Self {
        Self {
            reset_replication_result: Vec::new(),
            reset_replication_error: None,
            expected_start_status: None,
            start_replication_result: Vec::new(),
            expected_set_master_input: None,
            set_master_result: Vec::new(),
            expected_journal_token: None,
            master_connect_retry: DEFAULT_MASTER_CONNECT_RETRY,
        }
    }
}

impl ReparentFixture {
    pub fn reset_commands(&self) -> DaemonResult<Vec<String>> {
        match &self.reset_replication_error {
            Some(message) => Err(DaemonError::injected(message.clone())),
            None => Ok(self.reset_replication_result.clone()),
        }
    }

    /// `status` with the forced reconnect interval applied.
    pub fn normalize(&self, status: &ReplicationStatus) -> ReplicationStatus {
        ReplicationStatus {
            master_connect_retry: self.master_connect_retry.as_secs(),
            ..status.clone()
        }
    }

    pub fn start_commands(&self, status: &ReplicationStatus) -> DaemonResult<Vec<String>> {
        let actual = self.normalize(status);
        match &self.expected_start_status {
            Some(expected) if *expected == actual => Ok(self.start_replication_result.clone()),
            Some(expected) => Err(DaemonError::mismatch(
                "status for start_replication_commands",
                format!("{:?}", expected),
                format!("{:?}", actual),
            )),
            None => Err(DaemonError::mismatch(
                "status for start_replication_commands",
                "<unset>",
                format!("{:?}", actual),
            )),
        }
    }

    pub fn set_master_commands(&self, host: &str, port: u16) -> DaemonResult<Vec<String>> {
        let input = format!("{}:{}", host, port);
        match &self.expected_set_master_input {
            Some(expected) if *expected == input => Ok(self.set_master_result.clone()),
            Some(expected) => Err(DaemonError::mismatch("input for set_master_commands", expected, input)),
            None => Err(DaemonError::mismatch("input for set_master_commands", "<unset>", input)),
        }
    }

    pub fn check_journal(&self, time_created_ns: i64) -> DaemonResult<()> {
        match self.expected_journal_token {
            Some(expected) if expected != time_created_ns => Err(DaemonError::mismatch(
                "token for wait_for_reparent_journal",
                expected,
                time_created_ns,
            )),
            _ => Ok(()),
        }
    }
}
