//! Per-user grants and revokes layered on top of role defaults
//!
//! The role table stays the floor: overrides never touch it. Effective
//! access is `(role defaults ∪ grants) \ revokes`, so a revoke always wins.

use super::service::parse_role;
use super::types::{Module, ModuleAction, Role, SidebarMenu};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Explicit per-user adjustments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermissionOverrides {
    pub granted_actions: BTreeSet<(Module, ModuleAction)>,
    pub revoked_actions: BTreeSet<(Module, ModuleAction)>,
    pub granted_menus: BTreeSet<SidebarMenu>,
    pub revoked_menus: BTreeSet<SidebarMenu>,
}

impl PermissionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, module: Module, action: ModuleAction) -> Self {
        self.granted_actions.insert((module, action));
        self
    }

    pub fn revoke(mut self, module: Module, action: ModuleAction) -> Self {
        self.revoked_actions.insert((module, action));
        self
    }

    pub fn grant_menu(mut self, menu: SidebarMenu) -> Self {
        self.granted_menus.insert(menu);
        self
    }

    pub fn revoke_menu(mut self, menu: SidebarMenu) -> Self {
        self.revoked_menus.insert(menu);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.granted_actions.is_empty()
            && self.revoked_actions.is_empty()
            && self.granted_menus.is_empty()
            && self.revoked_menus.is_empty()
    }
}

/// A role claim combined with one user's overrides
#[derive(Debug, Clone, Copy)]
pub struct EffectivePermissions<'a> {
    role: Option<Role>,
    overrides: &'a PermissionOverrides,
}

impl<'a> EffectivePermissions<'a> {
    /// An unknown role keeps only what `overrides` grants explicitly
    pub fn new(role: &str, overrides: &'a PermissionOverrides) -> Self {
        Self { role: parse_role(role), overrides }
    }

    pub fn for_role(role: Role, overrides: &'a PermissionOverrides) -> Self {
        Self { role: Some(role), overrides }
    }

    /// The validated role, if the claim named one
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn can_perform_action(&self, module: Module, action: ModuleAction) -> bool {
        if self.overrides.revoked_actions.contains(&(module, action)) {
            return false;
        }
        self.overrides.granted_actions.contains(&(module, action))
            || self.role.is_some_and(|r| r.can_perform_action(module, action))
    }

    pub fn can_access_sidebar_menu(&self, menu: SidebarMenu) -> bool {
        if self.overrides.revoked_menus.contains(&menu) {
            return false;
        }
        self.overrides.granted_menus.contains(&menu)
            || self.role.is_some_and(|r| r.can_access_sidebar_menu(menu))
    }

    pub fn has_module_access(&self, module: Module) -> bool {
        !self.allowed_actions(module).is_empty()
    }

    /// Effective actions on `module`, in [`ModuleAction::ALL`] order
    pub fn allowed_actions(&self, module: Module) -> Vec<ModuleAction> {
        ModuleAction::ALL
            .iter()
            .copied()
            .filter(|action| self.can_perform_action(module, *action))
            .collect()
    }

    /// Effective menus, in [`SidebarMenu::ALL`] order
    pub fn allowed_sidebar_menus(&self) -> Vec<SidebarMenu> {
        SidebarMenu::ALL.iter().copied().filter(|menu| self.can_access_sidebar_menu(*menu)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_overrides_matches_role_defaults() {
        let overrides = PermissionOverrides::new();
        assert!(overrides.is_empty());
        for role in Role::ALL {
            let effective = EffectivePermissions::new(role.as_str(), &overrides);
            for module in Module::ALL {
                assert_eq!(effective.allowed_actions(*module), role.allowed_actions(*module));
                assert_eq!(effective.has_module_access(*module), role.has_module_access(*module));
            }
        }
    }

    #[test]
    fn test_grant_extends_role() {
        let overrides = PermissionOverrides::new().grant(Module::Patients, ModuleAction::Export);
        let effective = EffectivePermissions::new("technician", &overrides);
        assert!(effective.can_perform_action(Module::Patients, ModuleAction::Export));
        assert!(!Role::Technician.can_perform_action(Module::Patients, ModuleAction::Export));
    }

    #[test]
    fn test_revoke_wins_over_role_and_grant() {
        let overrides = PermissionOverrides::new()
            .grant(Module::Patients, ModuleAction::Delete)
            .revoke(Module::Patients, ModuleAction::Delete)
            .revoke_menu(SidebarMenu::Analytics);
        let effective = EffectivePermissions::new("doctor", &overrides);
        assert!(!effective.can_perform_action(Module::Patients, ModuleAction::Delete));
        assert!(!effective.can_access_sidebar_menu(SidebarMenu::Analytics));
        assert!(effective.can_access_sidebar_menu(SidebarMenu::Dashboard));
    }

    #[test]
    fn test_unknown_role_only_gets_explicit_grants() {
        let overrides = PermissionOverrides::new()
            .grant(Module::Reports, ModuleAction::View)
            .grant_menu(SidebarMenu::Files);
        let effective = EffectivePermissions::new("not_a_role", &overrides);
        assert_eq!(effective.allowed_actions(Module::Reports), vec![ModuleAction::View]);
        assert!(!effective.has_module_access(Module::Patients));
        assert_eq!(effective.allowed_sidebar_menus(), vec![SidebarMenu::Files]);
    }
}
