//! Replication value types
//!
//! - `ReplicationPosition`: GTID set, compared structurally
//! - `ReplicationStatus`: snapshot of a daemon's replication threads and upstream
//! - `sql`: the statements whose execution changes replication state, and the
//!   reparent journal statements orchestration code writes

mod position;
pub mod sql;
mod status;

pub use position::{PositionParseError, ReplicationPosition};
pub use sql::{START_REPLICATION_SQL, STOP_REPLICATION_SQL};
pub use status::ReplicationStatus;
