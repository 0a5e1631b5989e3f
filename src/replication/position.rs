//! Replication Position
//!
//! A position is a GTID set: for every source server that has written to the
//! stream, the highest transaction sequence number applied. Positions are
//! compared structurally. No ordering between positions is defined here; a
//! caller waiting on a position waits for an exact match.
//!
//! Textual form: `<server-uuid>:1-<seq>[,<server-uuid>:1-<seq>...]`, sources
//! sorted by UUID. The empty position renders as the empty string.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// Position parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionParseError {
    #[error("missing ':' in GTID entry '{0}'")]
    MissingSeparator(String),

    #[error("invalid server uuid '{0}'")]
    InvalidServerId(String),

    #[error("invalid transaction interval '{0}' (expected 1-N)")]
    InvalidInterval(String),

    #[error("duplicate server uuid {0}")]
    DuplicateServer(Uuid),
}

/// Point in a replication stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReplicationPosition {
    sources: BTreeMap<Uuid, u64>,
}

impl ReplicationPosition {
    /// Empty position (nothing replicated yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Position with a single source.
    pub fn single(server: Uuid, sequence: u64) -> Self {
        Self::new().with_source(server, sequence)
    }

    /// Set the highest sequence for `server`.
    ///
    /// A sequence of zero removes the source.
    pub fn with_source(mut self, server: Uuid, sequence: u64) -> Self {
        if sequence == 0 {
            self.sources.remove(&server);
        } else {
            self.sources.insert(server, sequence);
        }
        self
    }

    /// Highest sequence applied from `server`, zero if unknown.
    pub fn sequence(&self, server: &Uuid) -> u64 {
        self.sources.get(server).copied().unwrap_or(0)
    }

    /// Whether no transactions are recorded.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Iterate `(server, sequence)` in UUID order.
    pub fn sources(&self) -> impl Iterator<Item = (&Uuid, &u64)> {
        self.sources.iter()
    }
}

impl fmt::Display for ReplicationPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (server, sequence) in &self.sources {
            if !first {
                write!(f, ",")?;
            }
            if *sequence == 1 {
                write!(f, "{}:1", server)?;
            } else {
                write!(f, "{}:1-{}", server, sequence)?;
            }
            first = false;
        }
        Ok(())
    }
}

impl FromStr for ReplicationPosition {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sources = BTreeMap::new();

        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (server, interval) = entry
                .split_once(':')
                .ok_or_else(|| PositionParseError::MissingSeparator(entry.to_string()))?;

            let server = Uuid::parse_str(server.trim())
                .map_err(|_| PositionParseError::InvalidServerId(server.to_string()))?;

            // A single transaction is written `uuid:1`.
            let sequence = match interval.trim().split_once('-') {
                Some(("1", end)) => end.parse::<u64>().ok(),
                None if interval.trim() == "1" => Some(1),
                _ => None,
            }
            .filter(|seq| *seq > 0)
            .ok_or_else(|| PositionParseError::InvalidInterval(interval.to_string()))?;

            if sources.insert(server, sequence).is_some() {
                return Err(PositionParseError::DuplicateServer(server));
            }
        }

        Ok(Self { sources })
    }
}

impl Serialize for ReplicationPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReplicationPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER_A: &str = "3e11fa47-71ca-11e1-9e33-c80aa9429562";
    const SERVER_B: &str = "8ad3c6e0-71ca-11e1-9e33-c80aa9429562";

    fn server(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    #[test]
    fn test_empty_position() {
        let pos = ReplicationPosition::new();
        assert!(pos.is_empty());
        assert_eq!(pos.to_string(), "");
        assert_eq!("".parse::<ReplicationPosition>().unwrap(), pos);
    }

    #[test]
    fn test_display_sorted_by_server() {
        let pos = ReplicationPosition::new()
            .with_source(server(SERVER_B), 7)
            .with_source(server(SERVER_A), 23);

        assert_eq!(
            pos.to_string(),
            format!("{}:1-23,{}:1-7", SERVER_A, SERVER_B)
        );
    }

    #[test]
    fn test_parse_two_sources() {
        let text = format!("{}:1-23, {}:1-7", SERVER_A, SERVER_B);
        let pos: ReplicationPosition = text.parse().unwrap();

        assert_eq!(pos.sequence(&server(SERVER_A)), 23);
        assert_eq!(pos.sequence(&server(SERVER_B)), 7);
    }

    #[test]
    fn test_structural_equality() {
        let a = ReplicationPosition::single(server(SERVER_A), 5);
        let b: ReplicationPosition = format!("{}:1-5", SERVER_A).parse().unwrap();
        let c = ReplicationPosition::single(server(SERVER_A), 6);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_sequence_removes_source() {
        let pos = ReplicationPosition::single(server(SERVER_A), 5).with_source(server(SERVER_A), 0);
        assert!(pos.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "nonsense".parse::<ReplicationPosition>(),
            Err(PositionParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "not-a-uuid:1-5".parse::<ReplicationPosition>(),
            Err(PositionParseError::InvalidServerId(_))
        ));
        assert!(matches!(
            format!("{}:3-5", SERVER_A).parse::<ReplicationPosition>(),
            Err(PositionParseError::InvalidInterval(_))
        ));
        assert!(matches!(
            format!("{}:1-5,{}:1-6", SERVER_A, SERVER_A).parse::<ReplicationPosition>(),
            Err(PositionParseError::DuplicateServer(_))
        ));
    }

    #[test]
    fn test_single_transaction_short_form() {
        let pos: ReplicationPosition = format!("{}:1", SERVER_A).parse().unwrap();
        assert_eq!(pos, ReplicationPosition::single(server(SERVER_A), 1));
        assert_eq!(pos.to_string(), format!("{}:1", SERVER_A));

        let long: ReplicationPosition = format!("{}:1-1", SERVER_A).parse().unwrap();
        assert_eq!(long, pos);

        assert!(matches!(
            format!("{}:2", SERVER_A).parse::<ReplicationPosition>(),
            Err(PositionParseError::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_serde_uses_text_form() {
        let pos = ReplicationPosition::single(server(SERVER_A), 42);
        let json = serde_json::to_string(&pos).unwrap();
        assert_eq!(json, format!("\"{}:1-42\"", SERVER_A));

        let back: ReplicationPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pos);
    }
}
