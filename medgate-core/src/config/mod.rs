//! Configuration for the medgate server and CLI
//!
//! Values are resolved in this order (highest priority wins):
//!
//! 1. **Code** (builder methods on [`MedgateServer`](crate::app::MedgateServer))
//! 2. **Environment variables** (`MEDGATE_*`)
//! 3. **Config file** (`medgate.toml`)
//! 4. **Defaults**
//!
//! Every section may be omitted from the file; missing keys keep their
//! defaults.

pub mod logging;
pub mod rbac;
pub mod server;
pub mod sessions;

pub use logging::LoggingConfig;
pub use rbac::{IdentitySource, RbacConfig, ResolutionMode};
pub use server::ServerConfig;
pub use sessions::SessionsConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "medgate.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedgateConfig {
    pub server: ServerConfig,
    pub rbac: RbacConfig,
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
}

impl MedgateConfig {
    /// Defaults, then `medgate.toml` if present, then the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }

        config.apply_env_vars();
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.server.merge(other.server);
        self.rbac.merge(other.rbac);
        self.sessions.merge(other.sessions);
        self.logging.merge(other.logging);
    }

    pub fn apply_env_vars(&mut self) {
        self.server.apply_env_vars();
        self.rbac.apply_env_vars();
        self.sessions.apply_env_vars();
        self.logging.apply_env_vars();
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.rbac.validate()?;
        self.sessions.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Boolean switch from the environment
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`. Anything else
/// is logged and ignored, leaving the current value in place.
pub(crate) fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    let flag = parse_flag(&value);
    if flag.is_none() {
        log::warn!("Ignoring {}={}", name, value);
    }
    flag
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
