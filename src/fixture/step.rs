//! Scripted fixture steps
//!
//! A step is one call against the daemon (or one assertion about its state),
//! written as a JSON object tagged by `op`:
//!
//! ```json
//! {"op": "execute", "queries": ["STOP SLAVE"]}
//! {"op": "start", "expect_failure": true}
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::replication::ReplicationPosition;

/// What a step does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Action {
    /// `execute_admin_queries`
    Execute { queries: Vec<String> },
    /// `fetch_query`, optionally checking the row count
    Fetch {
        query: String,
        #[serde(default)]
        expect_rows: Option<usize>,
    },
    SetReadOnly { on: bool },
    Start,
    Shutdown {
        #[serde(default)]
        wait: bool,
    },
    EnableBinlogPlayback,
    DisableBinlogPlayback,
    /// `set_master_commands`, then execute whatever it returned
    Reparent { host: String, port: u16 },
    /// `wait_for_master_position` (returns immediately on a fake daemon)
    WaitForPosition { position: ReplicationPosition },
    ExpectReplicating { value: bool },
    ExpectReadOnly { value: bool },
    /// All expected admin queries have been executed
    CheckConsumed,
}

impl Action {
    /// Tag used in fixture files and logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Execute { .. } => "execute",
            Action::Fetch { .. } => "fetch",
            Action::SetReadOnly { .. } => "set_read_only",
            Action::Start => "start",
            Action::Shutdown { .. } => "shutdown",
            Action::EnableBinlogPlayback => "enable_binlog_playback",
            Action::DisableBinlogPlayback => "disable_binlog_playback",
            Action::Reparent { .. } => "reparent",
            Action::WaitForPosition { .. } => "wait_for_position",
            Action::ExpectReplicating { .. } => "expect_replicating",
            Action::ExpectReadOnly { .. } => "expect_read_only",
            Action::CheckConsumed => "check_consumed",
        }
    }
}

/// One scripted step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,

    /// The step passes only if the daemon call fails
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expect_failure: bool,
}

impl Step {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            expect_failure: false,
        }
    }

    /// Step that must fail.
    pub fn failing(action: Action) -> Self {
        Self {
            action,
            expect_failure: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.action.name()
    }
}

// Every key must belong to the action or be `expect_failure`; a misspelled
// key would otherwise drop the check it was meant to carry.
impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        let expect_failure = match fields.remove("expect_failure") {
            None => false,
            Some(Value::Bool(flag)) => flag,
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "expect_failure must be a boolean, got {}",
                    other
                )))
            }
        };

        let action = Action::deserialize(Value::Object(fields.clone())).map_err(de::Error::custom)?;

        if let Value::Object(known) = serde_json::to_value(&action).map_err(de::Error::custom)? {
            if let Some(key) = fields.keys().find(|key| !known.contains_key(key.as_str())) {
                return Err(de::Error::custom(format!(
                    "unknown field `{}` in {} step",
                    key,
                    action.name()
                )));
            }
        }

        Ok(Step {
            action,
            expect_failure,
        })
    }
}

impl From<Action> for Step {
    fn from(action: Action) -> Self {
        Step::new(action)
    }
}
