//! Schema change request and outcome

use serde::{Deserialize, Serialize};

use super::definition::SchemaDefinition;

/// A DDL change to apply to one database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaChange {
    /// DDL statement(s)
    pub sql: String,
    /// Apply even if the current schema differs from `before_schema`
    #[serde(default)]
    pub force: bool,
    /// Let the change flow to replicas through the binlog
    #[serde(default)]
    pub allow_replication: bool,
    /// Schema the caller expects before the change
    #[serde(default)]
    pub before_schema: Option<SchemaDefinition>,
    /// Schema the caller expects after the change
    #[serde(default)]
    pub after_schema: Option<SchemaDefinition>,
}

impl SchemaChange {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Default::default()
        }
    }
}

/// Schema before and after a change (real or estimated)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaChangeResult {
    pub before_schema: SchemaDefinition,
    pub after_schema: SchemaDefinition,
}

impl SchemaChangeResult {
    /// Whether the change modified anything.
    pub fn is_noop(&self) -> bool {
        self.before_schema.version == self.after_schema.version
    }
}
