//! CLI command implementations
//!
//! Commands load a fixture, act on it, and write one JSON response to stdout.
//! Step-by-step progress goes through the structured logger.

use std::path::Path;

use serde_json::{json, Value};

use crate::fixture::Fixture;
use crate::observability::{Logger, Severity};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if cli.trace {
        Logger::set_min_severity(Severity::Trace);
    }
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Replay { fixture } => replay(&fixture),
        Command::Inspect { fixture } => inspect(&fixture),
    }
}

/// Replay a fixture file
///
/// Writes the replay report on success. On failure writes the error response
/// and returns the error, so the process exits non-zero.
pub fn replay(fixture_path: &Path) -> CliResult<()> {
    let outcome = Fixture::load(fixture_path)
        .map_err(CliError::from)
        .and_then(|fixture| fixture.replay().map_err(CliError::from));

    match outcome {
        Ok(report) => write_response(serde_json::to_value(&report)?),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Print what a fixture file configures
pub fn inspect(fixture_path: &Path) -> CliResult<()> {
    let fixture = Fixture::load(fixture_path)?;
    write_response(describe(&fixture)?)
}

fn describe(fixture: &Fixture) -> CliResult<Value> {
    let daemon = fixture.build_daemon();
    let steps: Vec<&str> = fixture.steps.iter().map(|s| s.name()).collect();

    Ok(json!({
        "name": fixture.label(),
        "initial_state": serde_json::to_value(daemon.state())?,
        "listen_port": fixture.daemon.listen_port,
        "master_connect_retry_secs": fixture.daemon.master_connect_retry_secs,
        "expected_queries": serde_json::to_value(&fixture.daemon.expected_queries)?,
        "fetch_queries": fixture
            .daemon
            .fetch_results
            .as_ref()
            .map(|table| {
                let mut queries: Vec<&String> = table.keys().collect();
                queries.sort();
                queries
            }),
        "steps": steps,
    }))
}
