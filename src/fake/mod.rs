//! Scriptable fake daemon
//!
//! `FakeDaemon` implements `DatabaseDaemon` from canned values. Its parts
//! are usable on their own:
//! - `DaemonState`: lifecycle and replication flags with guarded transitions
//! - `QueryExpectations`: ordered admin query expectations, exact or prefix
//! - `FetchResults`: repeatable query → result lookups
//! - `ReparentFixture`: expected reparent inputs and canned command lists
//! - `FakeConnection`: pool connection answering from `FetchResults`
//!
//! Tests configure a daemon, run the orchestration code under test against
//! it, then call `check_admin_queries_consumed` to catch expectations that
//! were never exercised.

mod config;
mod connection;
mod daemon;
mod expectations;
mod fetch;
mod reparent;
mod state;

pub use config::FakeDaemonConfig;
pub use connection::{FakeConnection, QueryLog};
pub use daemon::FakeDaemon;
pub use expectations::{ExpectedQuery, QueryExpectations, PREFIX_MARKER};
pub use fetch::FetchResults;
pub use reparent::{ReparentFixture, DEFAULT_MASTER_CONNECT_RETRY};
pub use state::DaemonState;
