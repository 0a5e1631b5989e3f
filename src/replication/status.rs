//! Replication Status snapshot
//!
//! Built fresh on every query, never cached.

use serde::{Deserialize, Serialize};

use super::position::ReplicationPosition;

/// Replication state of a daemon at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationStatus {
    /// Position applied so far
    #[serde(default)]
    pub position: ReplicationPosition,

    /// Inbound (IO) thread running
    #[serde(default)]
    pub io_thread_running: bool,

    /// Applier (SQL) thread running
    #[serde(default)]
    pub sql_thread_running: bool,

    /// Upstream host
    #[serde(default)]
    pub master_host: String,

    /// Upstream port
    #[serde(default)]
    pub master_port: u16,

    /// Reconnect interval in seconds
    #[serde(default)]
    pub master_connect_retry: u64,
}

impl ReplicationStatus {
    /// Both replication threads are running.
    pub fn is_replicating(&self) -> bool {
        self.io_thread_running && self.sql_thread_running
    }

    /// `host:port` of the upstream.
    pub fn master_addr(&self) -> String {
        format!("{}:{}", self.master_host, self.master_port)
    }
}
