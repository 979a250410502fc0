//! Role resolution and enforcement configuration

use crate::permissions::parse_role;
use crate::rbac::ResolutionPolicy;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// What to do when the user directory cannot answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Reject the request with 503
    #[default]
    FailClosed,
    /// Continue as `fallback_role`
    Fallback,
}

/// Where the authenticated subject comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// Trusted header set by an upstream authenticator
    #[default]
    Header,
    /// Session id in a cookie or Bearer token
    Session,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacConfig {
    /// Env: MEDGATE_RBAC_RESOLUTION ("fail_closed" | "fallback")
    /// Default: fail_closed
    pub resolution: ResolutionMode,

    /// Role used when `resolution = "fallback"` and the directory is down
    /// Env: MEDGATE_RBAC_FALLBACK_ROLE
    /// Default: None
    pub fallback_role: Option<String>,

    /// Header carrying the subject when `identity_source = "header"`
    /// Env: MEDGATE_RBAC_IDENTITY_HEADER
    /// Default: "x-user-id"
    pub identity_header: String,

    /// Env: MEDGATE_RBAC_IDENTITY_SOURCE ("header" | "session")
    /// Default: header
    pub identity_source: IdentitySource,

    /// Log every guard decision
    /// Env: MEDGATE_RBAC_AUDIT
    /// Default: true
    pub audit_decisions: bool,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            resolution: ResolutionMode::FailClosed,
            fallback_role: None,
            identity_header: "x-user-id".to_string(),
            identity_source: IdentitySource::Header,
            audit_decisions: true,
        }
    }
}

impl RbacConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(mode) = env::var("MEDGATE_RBAC_RESOLUTION") {
            match mode.as_str() {
                "fail_closed" => self.resolution = ResolutionMode::FailClosed,
                "fallback" => self.resolution = ResolutionMode::Fallback,
                other => log::warn!("Ignoring MEDGATE_RBAC_RESOLUTION={}", other),
            }
        }

        if let Ok(role) = env::var("MEDGATE_RBAC_FALLBACK_ROLE") {
            self.fallback_role = Some(role);
        }

        if let Ok(header) = env::var("MEDGATE_RBAC_IDENTITY_HEADER") {
            self.identity_header = header;
        }

        if let Ok(source) = env::var("MEDGATE_RBAC_IDENTITY_SOURCE") {
            match source.as_str() {
                "header" => self.identity_source = IdentitySource::Header,
                "session" => self.identity_source = IdentitySource::Session,
                other => log::warn!("Ignoring MEDGATE_RBAC_IDENTITY_SOURCE={}", other),
            }
        }

        if let Some(audit) = super::env_flag("MEDGATE_RBAC_AUDIT") {
            self.audit_decisions = audit;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.identity_header.trim().is_empty() {
            bail!("Invalid rbac.identity_header: cannot be empty");
        }

        match (self.resolution, self.fallback_role.as_deref()) {
            (ResolutionMode::Fallback, None) => {
                bail!("rbac.fallback_role is required when rbac.resolution = \"fallback\"")
            }
            (ResolutionMode::Fallback, Some(role)) if parse_role(role).is_none() => {
                bail!("rbac.fallback_role '{}' is not a declared role", role)
            }
            _ => Ok(()),
        }
    }

    /// Resolution policy for the [`RoleResolver`](crate::rbac::RoleResolver)
    ///
    /// Call [`validate`](Self::validate) first; an unusable fallback role
    /// degrades to fail-closed.
    pub fn policy(&self) -> ResolutionPolicy {
        match self.resolution {
            ResolutionMode::FailClosed => ResolutionPolicy::FailClosed,
            ResolutionMode::Fallback => self
                .fallback_role
                .as_deref()
                .and_then(parse_role)
                .map(ResolutionPolicy::Fallback)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Role;

    #[test]
    fn test_fallback_requires_declared_role() {
        let mut config = RbacConfig { resolution: ResolutionMode::Fallback, ..Default::default() };
        assert!(config.validate().is_err());

        config.fallback_role = Some("owner".to_string());
        assert!(config.validate().is_err());

        config.fallback_role = Some("technician".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.policy(), ResolutionPolicy::Fallback(Role::Technician));
    }

    #[test]
    fn test_default_policy_fails_closed() {
        let config = RbacConfig::default();
        assert_eq!(config.policy(), ResolutionPolicy::FailClosed);
        assert!(config.validate().is_ok());
    }
}
