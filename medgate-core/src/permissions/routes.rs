//! Protected routes - whole-page navigation requirements
//!
//! A path with no entry is open. A path with an entry is allowed only when
//! every requirement it declares holds for the role.

use super::overrides::{EffectivePermissions, PermissionOverrides};
use super::types::{Module, ModuleAction, Role, SidebarMenu};
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

/// Requirements bound to one exact URL path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedRoute {
    pub path: &'static str,
    pub allowed_roles: Option<&'static [Role]>,
    pub required_menu: Option<SidebarMenu>,
    pub required_module: Option<Module>,
    pub required_action: Option<ModuleAction>,
}

impl ProtectedRoute {
    const fn open(path: &'static str) -> Self {
        Self {
            path,
            allowed_roles: None,
            required_menu: None,
            required_module: None,
            required_action: None,
        }
    }

    const fn roles(mut self, roles: &'static [Role]) -> Self {
        self.allowed_roles = Some(roles);
        self
    }

    const fn menu(mut self, menu: SidebarMenu) -> Self {
        self.required_menu = Some(menu);
        self
    }

    const fn module(mut self, module: Module) -> Self {
        self.required_module = Some(module);
        self
    }

    const fn action(mut self, module: Module, action: ModuleAction) -> Self {
        self.required_module = Some(module);
        self.required_action = Some(action);
        self
    }

    /// Evaluate this entry for a raw role claim with no overrides
    pub fn allows(&self, role: &str) -> bool {
        self.permits(&EffectivePermissions::new(role, &PermissionOverrides::default()))
    }

    /// Evaluate this entry against effective permissions
    ///
    /// Order: role membership, menu, then the action check when both module
    /// and action are set, else the module check. First failure wins.
    /// Role membership is never granted by an override.
    pub fn permits(&self, effective: &EffectivePermissions<'_>) -> bool {
        if let Some(roles) = self.allowed_roles {
            if !effective.role().is_some_and(|r| roles.contains(&r)) {
                return false;
            }
        }

        if let Some(menu) = self.required_menu {
            if !effective.can_access_sidebar_menu(menu) {
                return false;
            }
        }

        match (self.required_module, self.required_action) {
            (Some(module), Some(action)) => effective.can_perform_action(module, action),
            (Some(module), None) => effective.has_module_access(module),
            // an action without a module names nothing to check
            (None, _) => true,
        }
    }
}

use ModuleAction::*;

pub static PROTECTED_ROUTES: &[ProtectedRoute] = &[
    ProtectedRoute::open("/").menu(SidebarMenu::Dashboard),
    ProtectedRoute::open("/patients").menu(SidebarMenu::Patients).action(Module::Patients, View),
    ProtectedRoute::open("/add-patient").action(Module::Patients, Add),
    ProtectedRoute::open("/edit-patient").action(Module::Patients, Edit),
    ProtectedRoute::open("/files").menu(SidebarMenu::Files).action(Module::Reports, View),
    ProtectedRoute::open("/dicom-viewer").menu(SidebarMenu::DicomViewer).action(Module::Reports, View),
    ProtectedRoute::open("/analytics").menu(SidebarMenu::Analytics).module(Module::Analytics),
    ProtectedRoute::open("/notifications")
        .menu(SidebarMenu::Notifications)
        .module(Module::Notifications),
    ProtectedRoute::open("/user-management")
        .roles(&[Role::SuperAdmin])
        .menu(SidebarMenu::UserManagement)
        .action(Module::Users, View),
    ProtectedRoute::open("/session-monitoring")
        .roles(&[Role::SuperAdmin])
        .menu(SidebarMenu::SessionMonitoring),
    ProtectedRoute::open("/settings")
        .roles(&[Role::SuperAdmin])
        .menu(SidebarMenu::Settings)
        .action(Module::Settings, View),
];

lazy_static! {
    static ref ROUTE_INDEX: HashMap<&'static str, &'static ProtectedRoute> =
        PROTECTED_ROUTES.iter().map(|route| (route.path, route)).collect();
}

/// Entry exactly matching `path`
pub fn find_route(path: &str) -> Option<&'static ProtectedRoute> {
    ROUTE_INDEX.get(path).copied()
}

/// Whole-page access check; paths without an entry are open
pub fn can_access_route(role: &str, path: &str) -> bool {
    match find_route(path) {
        Some(route) => route.allows(role),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::service::can_perform_action;

    #[test]
    fn test_paths_are_unique() {
        assert_eq!(ROUTE_INDEX.len(), PROTECTED_ROUTES.len());
    }

    #[test]
    fn test_unprotected_path_is_open() {
        assert!(can_access_route("technician", "/about"));
        assert!(can_access_route("not_a_role", "/about"));
        // exact match only
        assert!(can_access_route("not_a_role", "/patients/42"));
    }

    #[test]
    fn test_add_patient_route() {
        assert!(can_access_route("technician", "/add-patient"));
        assert!(can_access_route("doctor", "/add-patient"));
        assert!(!can_access_route("not_a_role", "/add-patient"));
    }

    #[test]
    fn test_role_restricted_routes() {
        assert!(can_access_route("super_admin", "/user-management"));
        assert!(!can_access_route("doctor", "/user-management"));
        assert!(!can_access_route("technician", "/session-monitoring"));
    }

    #[test]
    fn test_module_only_route() {
        assert!(can_access_route("doctor", "/analytics"));
        assert!(!can_access_route("technician", "/analytics"));
    }

    #[test]
    fn test_action_route_requires_the_action_not_just_the_module() {
        let route = ProtectedRoute::open("/export-patients").action(Module::Patients, Export);
        for role in Role::ALL {
            assert!(role.has_module_access(Module::Patients));
            assert_eq!(
                route.allows(role.as_str()),
                can_perform_action(role.as_str(), Module::Patients, Export)
            );
        }
        assert!(!route.allows("technician"));
    }

    #[test]
    fn test_permits_applies_overrides() {
        let route = find_route("/add-patient").unwrap();
        let revoked = PermissionOverrides::new().revoke(Module::Patients, Add);
        assert!(!route.permits(&EffectivePermissions::new("doctor", &revoked)));

        let granted = PermissionOverrides::new()
            .grant_menu(SidebarMenu::Analytics)
            .grant(Module::Analytics, View);
        let analytics = find_route("/analytics").unwrap();
        assert!(analytics.permits(&EffectivePermissions::new("technician", &granted)));

        // a grant never satisfies a role restriction
        let users = PermissionOverrides::new()
            .grant_menu(SidebarMenu::UserManagement)
            .grant(Module::Users, View);
        let route = find_route("/user-management").unwrap();
        assert!(!route.permits(&EffectivePermissions::new("doctor", &users)));
    }

    #[test]
    fn test_action_routes_agree_with_service() {
        for route in PROTECTED_ROUTES {
            if let (Some(module), Some(action)) = (route.required_module, route.required_action) {
                for role in Role::ALL {
                    if can_access_route(role.as_str(), route.path) {
                        assert!(role.can_perform_action(module, action));
                    }
                }
            }
        }
    }
}
