//! Permission Service - pure queries over the Role-Permission Table
//!
//! Two bindings of the same logic:
//! - typed methods on [`Role`], for callers that already hold a validated role
//! - string-keyed free functions, for callers holding a raw role claim
//!   (session payload, user record). These parse first and fail closed:
//!   an unknown role has no menus, no modules and no actions.
//!
//! Nothing here performs I/O or mutates state, so every function is safe to
//! call concurrently from request handlers and render paths alike.

use super::table::{self, RoleConfig, ROLE_PERMISSIONS};
use super::types::{Module, ModuleAction, Role, SidebarMenu};

impl Role {
    /// Table entry for this role
    pub fn config(self) -> Option<&'static RoleConfig> {
        table::lookup(self)
    }

    pub fn can_access_sidebar_menu(self, menu: SidebarMenu) -> bool {
        self.config().is_some_and(|c| c.sidebar_menus.contains(&menu))
    }

    pub fn can_perform_action(self, module: Module, action: ModuleAction) -> bool {
        self.config()
            .and_then(|c| c.permission_for(module))
            .is_some_and(|p| p.allows(action))
    }

    /// Coarse check: does the role have any grant at all on `module`
    pub fn has_module_access(self, module: Module) -> bool {
        self.config().is_some_and(|c| c.permission_for(module).is_some())
    }

    pub fn allowed_sidebar_menus(self) -> &'static [SidebarMenu] {
        self.config().map(|c| c.sidebar_menus).unwrap_or(&[])
    }

    pub fn allowed_actions(self, module: Module) -> &'static [ModuleAction] {
        self.config().and_then(|c| c.permission_for(module)).map(|p| p.actions).unwrap_or(&[])
    }
}

/// Parse a raw role claim, `None` if it is not a declared role key
pub fn parse_role(candidate: &str) -> Option<Role> {
    candidate.parse().ok()
}

/// True iff `candidate` exactly matches a declared role key
pub fn is_valid_role(candidate: &str) -> bool {
    parse_role(candidate).is_some()
}

pub fn can_access_sidebar_menu(role: &str, menu: SidebarMenu) -> bool {
    parse_role(role).is_some_and(|r| r.can_access_sidebar_menu(menu))
}

pub fn can_perform_action(role: &str, module: Module, action: ModuleAction) -> bool {
    parse_role(role).is_some_and(|r| r.can_perform_action(module, action))
}

pub fn has_module_access(role: &str, module: Module) -> bool {
    parse_role(role).is_some_and(|r| r.has_module_access(module))
}

/// Allowed menus in table order; empty for an unknown role
pub fn allowed_sidebar_menus(role: &str) -> &'static [SidebarMenu] {
    parse_role(role).map(Role::allowed_sidebar_menus).unwrap_or(&[])
}

/// Granted actions on `module`; empty (not an error) when nothing is granted
pub fn allowed_actions(role: &str, module: Module) -> &'static [ModuleAction] {
    parse_role(role).map(|r| r.allowed_actions(module)).unwrap_or(&[])
}

/// Raw lookup, `None` for an unknown role
pub fn role_config(role: &str) -> Option<&'static RoleConfig> {
    parse_role(role).and_then(Role::config)
}

/// Roles present in the table, for admin screens listing assignable roles
pub fn all_roles() -> Vec<Role> {
    ROLE_PERMISSIONS.iter().map(|(role, _)| *role).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_declared_role_has_config() {
        for role in Role::ALL {
            assert!(role_config(role.as_str()).is_some(), "{} has no config", role);
        }
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        assert!(!is_valid_role("not_a_role"));
        assert!(role_config("not_a_role").is_none());
        for menu in SidebarMenu::ALL {
            assert!(!can_access_sidebar_menu("not_a_role", *menu));
        }
        for module in Module::ALL {
            assert!(!has_module_access("not_a_role", *module));
            assert!(allowed_actions("not_a_role", *module).is_empty());
            for action in ModuleAction::ALL {
                assert!(!can_perform_action("not_a_role", *module, *action));
            }
        }
        assert!(allowed_sidebar_menus("not_a_role").is_empty());
    }

    #[test]
    fn test_empty_and_case_variants_rejected() {
        assert!(!is_valid_role(""));
        assert!(!is_valid_role("SUPER_ADMIN"));
        assert!(!is_valid_role("doctor "));
    }

    #[test]
    fn test_concrete_grants() {
        assert!(can_perform_action("doctor", Module::Patients, ModuleAction::Delete));
        assert!(!can_perform_action("technician", Module::Patients, ModuleAction::Delete));
        assert!(!can_perform_action("technician", Module::Patients, ModuleAction::Export));
        assert!(!has_module_access("doctor", Module::Users));
        assert!(can_access_sidebar_menu("super_admin", SidebarMenu::UserManagement));
        assert!(!can_access_sidebar_menu("doctor", SidebarMenu::UserManagement));
    }

    #[test]
    fn test_super_admin_is_superset_of_every_role() {
        for role in Role::ALL {
            for module in Module::ALL {
                let lesser: HashSet<_> = role.allowed_actions(*module).iter().collect();
                let top: HashSet<_> = Role::SuperAdmin.allowed_actions(*module).iter().collect();
                assert!(lesser.is_subset(&top), "{} on {} exceeds super_admin", role, module);
            }
            let menus: HashSet<_> = role.allowed_sidebar_menus().iter().collect();
            let top_menus: HashSet<_> = Role::SuperAdmin.allowed_sidebar_menus().iter().collect();
            assert!(menus.is_subset(&top_menus));
        }
    }

    #[test]
    fn test_module_access_iff_actions_non_empty() {
        for role in Role::ALL {
            for module in Module::ALL {
                assert_eq!(
                    role.has_module_access(*module),
                    !role.allowed_actions(*module).is_empty(),
                    "{} / {}",
                    role,
                    module
                );
            }
        }
    }

    #[test]
    fn test_menus_follow_declaration_order() {
        assert_eq!(
            allowed_sidebar_menus("technician"),
            &[
                SidebarMenu::Dashboard,
                SidebarMenu::Patients,
                SidebarMenu::AddPatient,
                SidebarMenu::Files,
                SidebarMenu::DicomViewer,
                SidebarMenu::Notifications,
            ]
        );
    }

    #[test]
    fn test_all_roles_in_table_order() {
        assert_eq!(all_roles(), vec![Role::SuperAdmin, Role::Doctor, Role::Technician]);
    }
}
