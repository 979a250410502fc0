//! Server configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Listener settings for the enforcement server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening address
    /// Env: MEDGATE_HOST
    /// Default: "127.0.0.1"
    pub host: String,

    /// Listening port
    /// Env: MEDGATE_PORT
    /// Default: 8080
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080 }
    }
}

impl ServerConfig {
    pub fn merge(&mut self, other: Self) {
        self.host = other.host;
        self.port = other.port;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(host) = env::var("MEDGATE_HOST") {
            self.host = host;
        }

        if let Ok(port) = env::var("MEDGATE_PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("Invalid port: port must be between 1 and 65535");
        }
        if self.host.is_empty() {
            bail!("Invalid host: host cannot be empty");
        }
        Ok(())
    }

    /// `host:port` string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
