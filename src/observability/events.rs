//! Observable events
//!
//! Events are explicit and typed. The fake daemon emits the simulation
//! events; the fixture runner and CLI emit the replay events.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Simulated daemon lifecycle
    /// Daemon marked running
    DaemonStart,
    /// Daemon marked stopped
    DaemonShutdown,
    /// Daemon resources released
    DaemonClosed,

    // Simulated replication
    /// Replication threads started by an intercepted statement
    ReplicationStarted,
    /// Replication threads stopped by an intercepted statement
    ReplicationStopped,
    /// Read-only flag changed
    ReadOnlyChanged,
    /// Binlog playback enabled
    BinlogPlaybackEnabled,
    /// Binlog playback disabled
    BinlogPlaybackDisabled,

    // Fixture replay
    /// Fixture file loaded
    FixtureLoaded,
    /// Replay step succeeded
    StepComplete,
    /// Replay step failed
    StepFailed,
    /// Whole replay succeeded
    ReplayComplete,
    /// Replay aborted on first failure
    ReplayFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DaemonStart => "DAEMON_START",
            Event::DaemonShutdown => "DAEMON_SHUTDOWN",
            Event::DaemonClosed => "DAEMON_CLOSED",

            Event::ReplicationStarted => "REPLICATION_STARTED",
            Event::ReplicationStopped => "REPLICATION_STOPPED",
            Event::ReadOnlyChanged => "READ_ONLY_CHANGED",
            Event::BinlogPlaybackEnabled => "BINLOG_PLAYBACK_ENABLED",
            Event::BinlogPlaybackDisabled => "BINLOG_PLAYBACK_DISABLED",

            Event::FixtureLoaded => "FIXTURE_LOADED",
            Event::StepComplete => "STEP_COMPLETE",
            Event::StepFailed => "STEP_FAILED",
            Event::ReplayComplete => "REPLAY_COMPLETE",
            Event::ReplayFailed => "REPLAY_FAILED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::StepFailed | Event::ReplayFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
