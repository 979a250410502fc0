//! Request-scoped identity types

use crate::permissions::{EffectivePermissions, PermissionOverrides, Role};
use serde::{Deserialize, Serialize};

/// Authenticated subject as delivered by upstream authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self { subject: subject.into() }
    }
}

/// User record as returned by the user directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    /// Raw role claim; validated against the table before any use
    pub role: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Per-user grants and revokes on top of the role
    #[serde(default)]
    pub overrides: PermissionOverrides,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            display_name: None,
            overrides: PermissionOverrides::default(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_overrides(mut self, overrides: PermissionOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Caller whose role has been resolved and validated for this request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub subject: String,
    pub role: Role,
    #[serde(skip_serializing_if = "PermissionOverrides::is_empty")]
    pub overrides: PermissionOverrides,
}

impl Caller {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self { subject: subject.into(), role, overrides: PermissionOverrides::default() }
    }

    pub fn with_overrides(mut self, overrides: PermissionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Role defaults adjusted by this caller's overrides
    pub fn permissions(&self) -> EffectivePermissions<'_> {
        EffectivePermissions::for_role(self.role, &self.overrides)
    }
}
