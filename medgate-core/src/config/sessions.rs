//! Sessions configuration

use crate::session::SessionConfig;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Env: MEDGATE_SESSION_COOKIE_NAME
    /// Default: "medgate_session"
    pub cookie_name: String,

    /// Env: MEDGATE_SESSION_COOKIE_ENABLED
    /// Default: true
    pub cookie_enabled: bool,

    /// Env: MEDGATE_SESSION_BEARER_ENABLED
    /// Default: true
    pub bearer_enabled: bool,

    /// Session lifetime in seconds
    /// Env: MEDGATE_SESSION_MAX_AGE
    /// Default: 28800 (8 hours)
    pub max_age_secs: u64,

    /// Seconds between sweeps of expired sessions from the store
    /// Env: MEDGATE_SESSION_CLEANUP_INTERVAL
    /// Default: 300 (5 minutes)
    pub cleanup_interval_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            cookie_name: "medgate_session".to_string(),
            cookie_enabled: true,
            bearer_enabled: true,
            max_age_secs: 8 * 60 * 60,
            cleanup_interval_secs: 300,
        }
    }
}

impl SessionsConfig {
    pub fn merge(&mut self, other: Self) {
        self.cookie_name = other.cookie_name;
        self.cookie_enabled = other.cookie_enabled;
        self.bearer_enabled = other.bearer_enabled;
        self.max_age_secs = other.max_age_secs;
        self.cleanup_interval_secs = other.cleanup_interval_secs;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(name) = env::var("MEDGATE_SESSION_COOKIE_NAME") {
            self.cookie_name = name;
        }

        if let Some(enabled) = super::env_flag("MEDGATE_SESSION_COOKIE_ENABLED") {
            self.cookie_enabled = enabled;
        }

        if let Some(enabled) = super::env_flag("MEDGATE_SESSION_BEARER_ENABLED") {
            self.bearer_enabled = enabled;
        }

        if let Ok(max_age) = env::var("MEDGATE_SESSION_MAX_AGE") {
            if let Ok(secs) = max_age.parse() {
                self.max_age_secs = secs;
            }
        }

        if let Ok(interval) = env::var("MEDGATE_SESSION_CLEANUP_INTERVAL") {
            match interval.parse() {
                Ok(secs) => self.cleanup_interval_secs = secs,
                Err(_) => log::warn!("Ignoring MEDGATE_SESSION_CLEANUP_INTERVAL={}", interval),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_age_secs == 0 {
            bail!("Invalid sessions.max_age_secs: must be greater than 0");
        }
        if self.cleanup_interval_secs == 0 {
            bail!("Invalid sessions.cleanup_interval_secs: must be greater than 0");
        }
        if self.cookie_enabled && self.cookie_name.is_empty() {
            bail!("Invalid sessions.cookie_name: cannot be empty when cookies are enabled");
        }
        if !self.cookie_enabled && !self.bearer_enabled {
            bail!("Sessions need at least one transport (cookie or bearer)");
        }
        Ok(())
    }

    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .with_cookie_name(self.cookie_name.clone())
            .with_cookie_auth(self.cookie_enabled)
            .with_bearer_auth(self.bearer_enabled)
            .with_max_age(Duration::from_secs(self.max_age_secs))
            .with_cleanup_interval(Duration::from_secs(self.cleanup_interval_secs))
    }
}
