//! The current user's role, as seen by the UI

use crate::permissions::{
    find_route, EffectivePermissions, Module, ModuleAction, PermissionOverrides, SidebarMenu,
};
use std::collections::BTreeSet;

static NO_OVERRIDES: PermissionOverrides = PermissionOverrides {
    granted_actions: BTreeSet::new(),
    revoked_actions: BTreeSet::new(),
    granted_menus: BTreeSet::new(),
    revoked_menus: BTreeSet::new(),
};

/// Role resolution state delivered by the session layer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleState {
    /// Resolution still in flight
    #[default]
    Loading,
    /// No authenticated user
    Anonymous,
    /// Raw role claim, not yet validated
    Resolved(String),
}

/// Permission queries bound to the current role and its overrides
///
/// A pure view over [`RoleState`]: re-create it whenever the role changes.
/// While loading or anonymous, every query answers as an unknown role would
/// and overrides are ignored.
#[derive(Debug, Clone, Default)]
pub struct PermissionContext {
    state: RoleState,
    overrides: PermissionOverrides,
}

impl PermissionContext {
    pub fn new(state: RoleState) -> Self {
        Self { state, overrides: PermissionOverrides::default() }
    }

    /// Attach the per-user overrides from `/api/permissions/me`
    pub fn with_overrides(mut self, overrides: PermissionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn loading() -> Self {
        Self::new(RoleState::Loading)
    }

    pub fn anonymous() -> Self {
        Self::new(RoleState::Anonymous)
    }

    pub fn resolved(role: impl Into<String>) -> Self {
        Self::new(RoleState::Resolved(role.into()))
    }

    pub fn state(&self) -> &RoleState {
        &self.state
    }

    pub fn user_role(&self) -> Option<&str> {
        match &self.state {
            RoleState::Resolved(role) => Some(role),
            RoleState::Loading | RoleState::Anonymous => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RoleState::Loading)
    }

    pub fn overrides(&self) -> &PermissionOverrides {
        &self.overrides
    }

    fn effective(&self) -> EffectivePermissions<'_> {
        match self.user_role() {
            Some(role) => EffectivePermissions::new(role, &self.overrides),
            None => EffectivePermissions::new("", &NO_OVERRIDES),
        }
    }

    pub fn can_access_sidebar_menu(&self, menu: SidebarMenu) -> bool {
        self.effective().can_access_sidebar_menu(menu)
    }

    pub fn can_perform_action(&self, module: Module, action: ModuleAction) -> bool {
        self.effective().can_perform_action(module, action)
    }

    pub fn has_module_access(&self, module: Module) -> bool {
        self.effective().has_module_access(module)
    }

    pub fn allowed_sidebar_menus(&self) -> Vec<SidebarMenu> {
        self.effective().allowed_sidebar_menus()
    }

    pub fn allowed_actions(&self, module: Module) -> Vec<ModuleAction> {
        self.effective().allowed_actions(module)
    }

    pub fn can_access_route(&self, path: &str) -> bool {
        find_route(path).map_or(true, |route| route.permits(&self.effective()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_context_answers_for_role() {
        let ctx = PermissionContext::resolved("technician");
        assert_eq!(ctx.user_role(), Some("technician"));
        assert!(!ctx.is_loading());
        assert!(ctx.can_perform_action(Module::Patients, ModuleAction::UploadFiles));
        assert!(!ctx.can_perform_action(Module::Patients, ModuleAction::Export));
        assert!(ctx.can_access_route("/add-patient"));
        assert!(!ctx.can_access_route("/settings"));
    }

    #[test]
    fn test_loading_and_anonymous_fail_closed() {
        for ctx in [PermissionContext::loading(), PermissionContext::anonymous()] {
            assert_eq!(ctx.user_role(), None);
            assert!(!ctx.can_access_sidebar_menu(SidebarMenu::Dashboard));
            assert!(!ctx.has_module_access(Module::Patients));
            assert!(ctx.allowed_sidebar_menus().is_empty());
            assert!(!ctx.can_access_route("/patients"));
            // unprotected paths stay open
            assert!(ctx.can_access_route("/login"));
        }
        assert!(PermissionContext::loading().is_loading());
        assert!(!PermissionContext::anonymous().is_loading());
    }

    #[test]
    fn test_forged_claim_gets_nothing() {
        let ctx = PermissionContext::resolved("Doctor");
        assert!(ctx.allowed_actions(Module::Patients).is_empty());
        assert!(!ctx.can_access_sidebar_menu(SidebarMenu::Patients));
    }

    #[test]
    fn test_overrides_shape_resolved_queries() {
        let overrides = PermissionOverrides::new()
            .revoke(Module::Patients, ModuleAction::Delete)
            .grant_menu(SidebarMenu::Analytics)
            .grant(Module::Analytics, ModuleAction::View);
        let ctx = PermissionContext::resolved("technician").with_overrides(overrides.clone());
        assert!(ctx.can_access_route("/analytics"));
        assert_eq!(ctx.allowed_actions(Module::Analytics), vec![ModuleAction::View]);
        assert!(ctx.allowed_sidebar_menus().contains(&SidebarMenu::Analytics));

        let doctor = PermissionContext::resolved("doctor").with_overrides(overrides.clone());
        assert!(!doctor.can_perform_action(Module::Patients, ModuleAction::Delete));
        assert!(doctor.can_perform_action(Module::Patients, ModuleAction::Edit));

        // nothing leaks through before the role arrives
        let loading = PermissionContext::loading().with_overrides(overrides);
        assert!(!loading.has_module_access(Module::Analytics));
        assert!(!loading.can_access_route("/analytics"));
    }
}
