//! Simulated daemon state
//!
//! Initial values are chosen with the `with_*` builders before the state is
//! handed to a daemon. Afterwards the flags move only through the transition
//! methods, and `replicating` only through the admin query path.
//!
//! Inbound and applier replication threads share one `replicating` flag.

use serde::Serialize;

use crate::daemon::{DaemonError, DaemonResult};

/// Lifecycle and replication flags of a simulated daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaemonState {
    running: bool,
    replicating: bool,
    read_only: bool,
    binlog_playback_enabled: bool,
}

impl Default for DaemonState {
    /// Running, not replicating, writable, playback disabled.
    fn default() -> Self {
        Self {
            running: true,
            replicating: false,
            read_only: false,
            binlog_playback_enabled: false,
        }
    }
}

impl DaemonState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_running(mut self, running: bool) -> Self {
        self.running = running;
        self
    }

    pub fn with_replicating(mut self, replicating: bool) -> Self {
        self.replicating = replicating;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_binlog_playback(mut self, enabled: bool) -> Self {
        self.binlog_playback_enabled = enabled;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_replicating(&self) -> bool {
        self.replicating
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_binlog_playback_enabled(&self) -> bool {
        self.binlog_playback_enabled
    }

    /// Stopped → running.
    pub fn start(&mut self) -> DaemonResult<()> {
        if self.running {
            return Err(DaemonError::invalid_state("fake daemon already running"));
        }
        self.running = true;
        Ok(())
    }

    /// Running → stopped.
    pub fn shutdown(&mut self) -> DaemonResult<()> {
        if !self.running {
            return Err(DaemonError::invalid_state("fake daemon not running"));
        }
        self.running = false;
        Ok(())
    }

    pub fn set_read_only(&mut self, on: bool) {
        self.read_only = on;
    }

    pub fn enable_binlog_playback(&mut self) -> DaemonResult<()> {
        if self.binlog_playback_enabled {
            return Err(DaemonError::invalid_state("binlog playback already enabled"));
        }
        self.binlog_playback_enabled = true;
        Ok(())
    }

    pub fn disable_binlog_playback(&mut self) -> DaemonResult<()> {
        if !self.binlog_playback_enabled {
            return Err(DaemonError::invalid_state("binlog playback already disabled"));
        }
        self.binlog_playback_enabled = false;
        Ok(())
    }

    /// Only called when a replication start/stop statement was executed.
    pub(crate) fn set_replicating(&mut self, replicating: bool) {
        self.replicating = replicating;
    }
}
