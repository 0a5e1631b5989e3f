//! CLI module for aerodb-ctl
//!
//! Provides command-line interface for:
//! - replay: Run a fixture's steps against a fake daemon
//! - inspect: Show what a fixture configures without running it

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{inspect, replay, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
