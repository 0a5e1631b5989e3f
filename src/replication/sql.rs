//! Administrative statements with replication meaning
//!
//! Two statements change replication state when executed: starting and
//! stopping the replication threads. Both are matched by exact text.
//!
//! The reparent journal is a table a new master writes one row into after a
//! reparent; replicas wait for that row (keyed by `time_created_ns`) to show
//! up before declaring the reparent complete. Its INSERT carries a timestamp,
//! so tests usually expect it with a prefix expectation.

use chrono::{DateTime, Utc};

use super::position::ReplicationPosition;

/// Starts both replication threads.
pub const START_REPLICATION_SQL: &str = "START SLAVE";

/// Stops both replication threads.
pub const STOP_REPLICATION_SQL: &str = "STOP SLAVE";

const JOURNAL_DATABASE: &str = "_ctl";

/// Statements that create the reparent journal if it is missing.
pub fn create_reparent_journal() -> Vec<String> {
    vec![
        format!("CREATE DATABASE IF NOT EXISTS {}", JOURNAL_DATABASE),
        format!(
            "CREATE TABLE IF NOT EXISTS {}.reparent_journal (\n  \
             time_created_ns BIGINT UNSIGNED NOT NULL,\n  \
             action_name VARBINARY(250) NOT NULL,\n  \
             master_alias VARBINARY(32) NOT NULL,\n  \
             replication_position VARBINARY(64000) DEFAULT NULL,\n  \
             PRIMARY KEY (time_created_ns))\n\
             ENGINE=InnoDB",
            JOURNAL_DATABASE
        ),
    ]
}

/// Text every journal INSERT starts with, up to the first value.
pub fn populate_reparent_journal_prefix() -> String {
    format!(
        "INSERT INTO {}.reparent_journal \
         (time_created_ns, action_name, master_alias, replication_position) VALUES (",
        JOURNAL_DATABASE
    )
}

/// INSERT recording a completed reparent.
pub fn populate_reparent_journal(
    time_created_ns: i64,
    action_name: &str,
    master_alias: &str,
    position: &ReplicationPosition,
) -> String {
    format!(
        "{}{}, {}, {}, {})",
        populate_reparent_journal_prefix(),
        time_created_ns,
        quote(action_name),
        quote(master_alias),
        quote(&position.to_string())
    )
}

/// SELECT a replica polls until the journal row for `time_created_ns` exists.
pub fn read_reparent_journal(time_created_ns: i64) -> String {
    format!(
        "SELECT action_name, master_alias, replication_position FROM {}.reparent_journal \
         WHERE time_created_ns={}",
        JOURNAL_DATABASE, time_created_ns
    )
}

/// Journal token for a reparent happening at `at`.
///
/// Saturates for instants past the year 2262.
pub fn reparent_journal_token(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Journal token for a reparent happening now.
pub fn reparent_journal_token_now() -> i64 {
    reparent_journal_token(Utc::now())
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}
