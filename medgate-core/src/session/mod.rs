//! Session lookup for authenticated subjects
//!
//! Sessions are the usual upstream of the permission guards: a login flow
//! (outside this crate) issues a [`Session`], and [`SessionTokens`] finds
//! its id again on later requests, in a cookie or a Bearer header.
//! [`spawn_cleanup`] sweeps expired sessions out of a store in the background.

mod memory;
mod store;

pub use memory::MemorySessionStore;
pub use store::{Session, SessionStore};

use chrono::Duration;
use http::HeaderMap;
use std::sync::Arc;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_age: Duration,
    pub cookie_name: String,
    pub cookie_enabled: bool,
    pub bearer_enabled: bool,
    /// Interval between background sweeps of expired sessions
    pub cleanup_interval: std::time::Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::hours(8),
            cookie_name: "medgate_session".to_string(),
            cookie_enabled: true,
            bearer_enabled: true,
            cleanup_interval: std::time::Duration::from_secs(300),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(mut self, max_age: std::time::Duration) -> Self {
        self.max_age = Duration::from_std(max_age).unwrap_or(Duration::hours(8));
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn with_cookie_auth(mut self, enabled: bool) -> Self {
        self.cookie_enabled = enabled;
        self
    }

    pub fn with_bearer_auth(mut self, enabled: bool) -> Self {
        self.bearer_enabled = enabled;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: std::time::Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }
}

/// Remove expired sessions from `store` every `every`, until aborted
pub fn spawn_cleanup(
    store: Arc<dyn SessionStore>,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(every);
        loop {
            timer.tick().await;

            match store.cleanup_expired().await {
                Ok(0) => {}
                Ok(count) => log::info!("Removed {} expired sessions", count),
                Err(e) => log::error!("Session cleanup failed: {}", e),
            }
        }
    })
}

/// Extracts a session id from request headers
///
/// Priority: Cookie > Bearer token.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    config: SessionConfig,
}

impl SessionTokens {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn extract(&self, headers: &HeaderMap) -> Option<String> {
        if self.config.cookie_enabled {
            if let Some(id) = self.from_cookie(headers) {
                log::debug!("Session id extracted from cookie");
                return Some(id);
            }
        }

        if self.config.bearer_enabled {
            if let Some(id) = Self::from_bearer(headers) {
                log::debug!("Session id extracted from Bearer token");
                return Some(id);
            }
        }

        None
    }

    fn from_cookie(&self, headers: &HeaderMap) -> Option<String> {
        let prefix = format!("{}=", self.config.cookie_name);
        headers
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .find_map(|cookie| cookie.trim().strip_prefix(prefix.as_str()).map(str::to_string))
            .filter(|id| !id.is_empty())
    }

    fn from_bearer(headers: &HeaderMap) -> Option<String> {
        headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}
