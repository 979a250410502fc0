//! Logging configuration

use crate::logging::{LogFormat, LogLevel, LogTarget};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Env: MEDGATE_LOG_LEVEL
    pub level: String,
    /// "human", "json" or "logfmt"
    /// Env: MEDGATE_LOG_FORMAT
    pub format: String,
    /// "stdout" or "stderr"
    /// Env: MEDGATE_LOG_TARGET
    pub target: String,
    /// Static fields attached to every entry
    pub context_fields: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "human".to_string(),
            target: "stdout".to_string(),
            context_fields: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("MEDGATE_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("MEDGATE_LOG_FORMAT") {
            self.format = format;
        }
        if let Ok(target) = env::var("MEDGATE_LOG_TARGET") {
            self.target = target;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.level()?;
        self.format()?;
        self.target()?;
        Ok(())
    }

    pub fn level(&self) -> Result<LogLevel> {
        self.level.parse().with_context(|| format!("Invalid logging.level '{}'", self.level))
    }

    pub fn format(&self) -> Result<LogFormat> {
        self.format.parse().with_context(|| format!("Invalid logging.format '{}'", self.format))
    }

    pub fn target(&self) -> Result<LogTarget> {
        self.target.parse().with_context(|| format!("Invalid logging.target '{}'", self.target))
    }
}
