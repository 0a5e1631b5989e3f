//! Connection parameters

use std::fmt;

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_charset() -> String {
    "utf8mb4".to_string()
}

/// Parameters for opening a database connection
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnParams {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub db_name: String,
    /// Unix socket path; takes precedence over host/port when set
    #[serde(default)]
    pub unix_socket: Option<String>,
    #[serde(default = "default_charset")]
    pub charset: String,
}

impl Default for ConnParams {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: String::new(),
            password: String::new(),
            db_name: String::new(),
            unix_socket: None,
            charset: default_charset(),
        }
    }
}

impl ConnParams {
    /// Human-readable target (`socket` path or `host:port`).
    pub fn target(&self) -> String {
        match &self.unix_socket {
            Some(socket) => socket.clone(),
            None => format!("{}:{}", self.host, self.port),
        }
    }
}

// Password never reaches logs or error messages.
impl fmt::Debug for ConnParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("unix_socket", &self.unix_socket)
            .field("charset", &self.charset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ConnParams::default();
        assert_eq!(params.target(), "localhost:3306");
        assert_eq!(params.charset, "utf8mb4");
    }

    #[test]
    fn test_socket_takes_precedence() {
        let params = ConnParams {
            unix_socket: Some("/var/run/db.sock".into()),
            ..Default::default()
        };
        assert_eq!(params.target(), "/var/run/db.sock");
    }

    #[test]
    fn test_password_hidden() {
        let params = ConnParams {
            password: "hunter2".into(),
            ..Default::default()
        };
        assert!(!format!("{:?}", params).contains("hunter2"));
        assert!(!serde_json::to_string(&params).unwrap().contains("hunter2"));
    }
}
