//! CLI argument definitions using clap
//!
//! Commands:
//! - aerodb-ctl replay --fixture <path>
//! - aerodb-ctl inspect --fixture <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aerodb-ctl - replay daemon control fixtures against a fake daemon
#[derive(Parser, Debug)]
#[command(name = "aerodb-ctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Also log simulated daemon transitions
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a fixture's steps and report the final daemon state
    Replay {
        /// Path to fixture file
        #[arg(long, default_value = "./fixture.json")]
        fixture: PathBuf,
    },

    /// Print a fixture's initial daemon state and expected queries
    Inspect {
        /// Path to fixture file
        #[arg(long, default_value = "./fixture.json")]
        fixture: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
