//! aerodb-ctl - daemon control interface and scriptable fake daemon
//!
//! `daemon::DatabaseDaemon` is the contract orchestration code drives a
//! replicated database server through. `fake::FakeDaemon` implements it from
//! canned values and checks the admin queries it receives against an ordered
//! list of expectations. `fixture` describes fake daemons and scripted
//! scenarios as JSON.

pub mod cli;
pub mod connection;
pub mod daemon;
pub mod fake;
pub mod fixture;
pub mod observability;
pub mod query;
pub mod replication;
pub mod schema;
