//! Daemon configuration
//!
//! What a daemon was configured with: identity, listening port and where its
//! files live. Loaded from JSON, immutable after load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{DaemonError, DaemonResult};

fn default_port() -> u16 {
    3306
}

/// Configuration of one database daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Replication server id, unique within a replication topology
    pub server_id: u32,

    /// Port the daemon listens on (default: 3306)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Data directory (required)
    pub data_dir: PathBuf,

    /// Unix socket path (default: `<data_dir>/mysql.sock`)
    #[serde(default)]
    pub socket_file: Option<PathBuf>,
}

impl DaemonConfig {
    pub fn new(server_id: u32, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            server_id,
            port: default_port(),
            data_dir: data_dir.into(),
            socket_file: None,
        }
    }

    /// Socket path, derived from the data directory when not set.
    pub fn socket_path(&self) -> PathBuf {
        self.socket_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("mysql.sock"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> DaemonResult<()> {
        if self.server_id == 0 {
            return Err(DaemonError::invalid_argument("server_id must be non-zero"));
        }
        if self.port == 0 {
            return Err(DaemonError::invalid_argument("port must be non-zero"));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(DaemonError::invalid_argument("data_dir must be set"));
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> DaemonResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DaemonError::invalid_argument(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: DaemonConfig = serde_json::from_str(&text).map_err(|e| {
            DaemonError::invalid_argument(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }
}
