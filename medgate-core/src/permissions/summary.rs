//! Permission introspection payload
//!
//! Lets a client bootstrap its navigation in one call instead of asking
//! about every menu entry and button separately.

use super::overrides::PermissionOverrides;
use super::table::Permission;
use super::types::{Module, Role, SidebarMenu};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsSummary {
    pub role: Role,
    pub role_name: &'static str,
    pub role_description: &'static str,
    pub sidebar_menus: &'static [SidebarMenu],
    pub permissions: &'static [Permission],
    pub modules: Vec<Module>,
    /// Per-user adjustments on top of the role defaults above
    #[serde(skip_serializing_if = "PermissionOverrides::is_empty")]
    pub overrides: PermissionOverrides,
}

impl PermissionsSummary {
    pub fn with_overrides(mut self, overrides: PermissionOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Summary for `role`, `None` if the role has no table entry
pub fn summarize(role: Role) -> Option<PermissionsSummary> {
    let config = role.config()?;
    Some(PermissionsSummary {
        role,
        role_name: config.name,
        role_description: config.description,
        sidebar_menus: config.sidebar_menus,
        permissions: config.permissions,
        modules: config.modules().collect(),
        overrides: PermissionOverrides::default(),
    })
}
