//! Fixtures
//!
//! A fixture is a JSON document describing a fake daemon and a script of
//! steps to run against it:
//!
//! ```json
//! {
//!   "name": "reparent replica",
//!   "daemon": {"expected_queries": ["STOP SLAVE", "SUBCHANGE MASTER TO", "START SLAVE"]},
//!   "steps": [
//!     {"op": "execute", "queries": ["STOP SLAVE", "CHANGE MASTER TO MASTER_HOST='db2'", "START SLAVE"]},
//!     {"op": "expect_replicating", "value": true},
//!     {"op": "check_consumed"}
//!   ]
//! }
//! ```
//!
//! Replay builds a fresh daemon every time, so a fixture can be replayed any
//! number of times with the same outcome. Replay stops at the first failing
//! step.

mod errors;
mod step;

pub use errors::{FixtureError, FixtureResult};
pub use step::{Action, Step};

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::daemon::{Context, DaemonError, DatabaseDaemon};
use crate::fake::{DaemonState, FakeDaemon, FakeDaemonConfig};
use crate::observability::{log_event_with_fields, Event};

/// Timeout handed to `wait_for_master_position` steps
const REPLAY_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fake daemon description plus a scripted scenario
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    /// Label used in logs
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub daemon: FakeDaemonConfig,

    pub steps: Vec<Step>,
}

/// Outcome of a successful replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub steps_run: usize,
    pub queries_consumed: usize,
    pub final_state: DaemonState,
}

enum StepFailure {
    Daemon(DaemonError),
    Check(String),
}

impl From<DaemonError> for StepFailure {
    fn from(e: DaemonError) -> Self {
        StepFailure::Daemon(e)
    }
}

impl Fixture {
    /// Load and validate a fixture file.
    pub fn load(path: &Path) -> FixtureResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| FixtureError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let fixture: Fixture = serde_json::from_str(&text).map_err(|e| FixtureError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fixture.validate()?;

        let steps = fixture.steps.len().to_string();
        log_event_with_fields(
            Event::FixtureLoaded,
            &[("fixture", fixture.label()), ("steps", &steps)],
        );
        Ok(fixture)
    }

    /// Validate the fixture.
    pub fn validate(&self) -> FixtureResult<()> {
        if self.steps.is_empty() {
            return Err(FixtureError::Invalid("fixture has no steps".into()));
        }
        if let Some(config) = &self.daemon.daemon {
            config
                .validate()
                .map_err(|e| FixtureError::Invalid(e.message))?;
        }
        if self.daemon.master_connect_retry_secs == 0 {
            return Err(FixtureError::Invalid(
                "master_connect_retry_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// Fresh fake daemon in the fixture's initial configuration.
    pub fn build_daemon(&self) -> FakeDaemon {
        FakeDaemon::from_config(self.daemon.clone())
    }

    /// Run every step against a fresh daemon, stopping at the first failure.
    pub fn replay(&self) -> FixtureResult<ReplayReport> {
        let mut daemon = self.build_daemon();

        for (index, step) in self.steps.iter().enumerate() {
            let idx = index.to_string();
            match run_step(&mut daemon, index, step) {
                Ok(()) => {
                    log_event_with_fields(Event::StepComplete, &[("index", &idx), ("op", step.name())]);
                }
                Err(e) => {
                    let reason = e.to_string();
                    log_event_with_fields(
                        Event::StepFailed,
                        &[("index", &idx), ("op", step.name()), ("error", &reason)],
                    );
                    log_event_with_fields(Event::ReplayFailed, &[("fixture", self.label())]);
                    daemon.close();
                    return Err(e);
                }
            }
        }

        let report = ReplayReport {
            steps_run: self.steps.len(),
            queries_consumed: daemon.expectations.consumed(),
            final_state: *daemon.state(),
        };
        daemon.close();

        let steps = report.steps_run.to_string();
        log_event_with_fields(
            Event::ReplayComplete,
            &[("fixture", self.label()), ("steps", &steps)],
        );
        Ok(report)
    }
}

fn run_step(daemon: &mut FakeDaemon, index: usize, step: &Step) -> FixtureResult<()> {
    let op = step.name();
    match (perform(daemon, &step.action), step.expect_failure) {
        (Ok(()), false) | (Err(_), true) => Ok(()),
        (Ok(()), true) => Err(FixtureError::Expectation {
            index,
            op,
            message: "expected failure, step succeeded".into(),
        }),
        (Err(StepFailure::Daemon(source)), false) => Err(FixtureError::StepFailed { index, op, source }),
        (Err(StepFailure::Check(message)), false) => Err(FixtureError::Expectation { index, op, message }),
    }
}

fn perform(daemon: &mut FakeDaemon, action: &Action) -> Result<(), StepFailure> {
    match action {
        Action::Execute { queries } => daemon.execute_admin_queries(queries)?,
        Action::Fetch { query, expect_rows } => {
            let result = daemon.fetch_query(query)?;
            if let Some(expected) = expect_rows {
                if result.len() != *expected {
                    return Err(StepFailure::Check(format!(
                        "expected {} rows, got {}",
                        expected,
                        result.len()
                    )));
                }
            }
        }
        Action::SetReadOnly { on } => daemon.set_read_only(*on)?,
        Action::Start => daemon.start(&Context::background())?,
        Action::Shutdown { wait } => daemon.shutdown(&Context::background(), *wait)?,
        Action::EnableBinlogPlayback => daemon.enable_binlog_playback()?,
        Action::DisableBinlogPlayback => daemon.disable_binlog_playback()?,
        Action::Reparent { host, port } => {
            let commands = daemon.set_master_commands(host, *port)?;
            daemon.execute_admin_queries(&commands)?;
        }
        Action::WaitForPosition { position } => {
            daemon.wait_for_master_position(position, REPLAY_WAIT_TIMEOUT)?
        }
        Action::ExpectReplicating { value } => {
            let status = daemon.replication_status()?;
            if status.is_replicating() != *value {
                return Err(StepFailure::Check(format!(
                    "expected replicating={}, got {}",
                    value,
                    status.is_replicating()
                )));
            }
        }
        Action::ExpectReadOnly { value } => {
            let read_only = daemon.is_read_only()?;
            if read_only != *value {
                return Err(StepFailure::Check(format!(
                    "expected read_only={}, got {}",
                    value, read_only
                )));
            }
        }
        Action::CheckConsumed => daemon.check_admin_queries_consumed()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::DaemonErrorKind;
    use crate::fake::ExpectedQuery;

    fn fixture(daemon: FakeDaemonConfig, steps: Vec<Step>) -> Fixture {
        Fixture {
            name: Some("test".into()),
            daemon,
            steps,
        }
    }

    #[test]
    fn test_replay_toggles_replication() {
        let fixture = fixture(
            FakeDaemonConfig {
                expected_queries: vec![ExpectedQuery::exact("START SLAVE")],
                ..Default::default()
            },
            vec![
                Action::ExpectReplicating { value: false }.into(),
                Action::Execute {
                    queries: vec!["START SLAVE".into()],
                }
                .into(),
                Action::ExpectReplicating { value: true }.into(),
                Action::CheckConsumed.into(),
            ],
        );

        let report = fixture.replay().unwrap();
        assert_eq!(report.steps_run, 4);
        assert_eq!(report.queries_consumed, 1);
        assert!(report.final_state.is_replicating());
    }

    #[test]
    fn test_replay_stops_at_first_failure() {
        let fixture = fixture(
            FakeDaemonConfig::default(),
            vec![
                Action::Shutdown { wait: true }.into(),
                Action::Shutdown { wait: true }.into(),
                Action::Start.into(),
            ],
        );

        let err = fixture.replay().unwrap_err();
        assert_eq!(err.step_index(), Some(1));
        match err {
            FixtureError::StepFailed { source, .. } => assert_eq!(source.kind, DaemonErrorKind::InvalidState),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_expect_failure() {
        let passing = fixture(FakeDaemonConfig::default(), vec![Step::failing(Action::Start)]);
        assert!(passing.replay().is_ok());

        let failing = fixture(FakeDaemonConfig::default(), vec![Step::failing(Action::SetReadOnly { on: true })]);
        assert!(matches!(failing.replay(), Err(FixtureError::Expectation { index: 0, .. })));
    }

    #[test]
    fn test_replay_is_repeatable() {
        let fixture = fixture(
            FakeDaemonConfig::default(),
            vec![Action::EnableBinlogPlayback.into(), Action::DisableBinlogPlayback.into()],
        );
        assert_eq!(fixture.replay().unwrap(), fixture.replay().unwrap());
    }

    #[test]
    fn test_validate_rejects_empty() {
        let fixture = fixture(FakeDaemonConfig::default(), Vec::new());
        assert!(matches!(fixture.validate(), Err(FixtureError::Invalid(_))));
    }

    #[test]
    fn test_fetch_row_count() {
        let fixture: Fixture = serde_json::from_value(serde_json::json!({
            "daemon": {
                "fetch_results": {
                    "SELECT 1": {"rows": [["1"]]}
                }
            },
            "steps": [
                {"op": "fetch", "query": "SELECT 1", "expect_rows": 1},
                {"op": "fetch", "query": "SELECT 1", "expect_rows": 2}
            ]
        }))
        .unwrap();

        let err = fixture.replay().unwrap_err();
        assert!(matches!(err, FixtureError::Expectation { index: 1, .. }));
    }
}
