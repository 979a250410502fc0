//! Declarative permission gate

use super::context::PermissionContext;
use crate::permissions::{Module, ModuleAction, ProtectedRoute, Role, SidebarMenu};

/// How multiple requirements combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    All,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Granted,
    Denied,
}

/// A set of requirements evaluated against a [`PermissionContext`]
///
/// With no requirements the gate always grants, even while the role is
/// loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGate {
    roles: Option<Vec<Role>>,
    menu: Option<SidebarMenu>,
    permission: Option<(Module, ModuleAction)>,
    module: Option<Module>,
    mode: MatchMode,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate mirroring a protected route's requirements
    pub fn for_route(route: &ProtectedRoute) -> Self {
        let mut gate = Self::new();
        if let Some(roles) = route.allowed_roles {
            gate = gate.roles(roles.iter().copied());
        }
        if let Some(menu) = route.required_menu {
            gate = gate.menu(menu);
        }
        match (route.required_module, route.required_action) {
            (Some(module), Some(action)) => gate.permission(module, action),
            (Some(module), None) => gate.module(module),
            (None, _) => gate,
        }
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = Some(roles.into_iter().collect());
        self
    }

    pub fn menu(mut self, menu: SidebarMenu) -> Self {
        self.menu = Some(menu);
        self
    }

    pub fn permission(mut self, module: Module, action: ModuleAction) -> Self {
        self.permission = Some((module, action));
        self
    }

    pub fn module(mut self, module: Module) -> Self {
        self.module = Some(module);
        self
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn match_any(self) -> Self {
        self.match_mode(MatchMode::Any)
    }

    fn results(&self, ctx: &PermissionContext) -> Vec<bool> {
        let role = ctx.user_role().and_then(crate::permissions::parse_role);
        let mut results = Vec::with_capacity(4);

        if let Some(roles) = &self.roles {
            results.push(role.is_some_and(|r| roles.contains(&r)));
        }
        if let Some(menu) = self.menu {
            results.push(ctx.can_access_sidebar_menu(menu));
        }
        if let Some((module, action)) = self.permission {
            results.push(ctx.can_perform_action(module, action));
        }
        if let Some(module) = self.module {
            results.push(ctx.has_module_access(module));
        }
        results
    }

    pub fn evaluate(&self, ctx: &PermissionContext) -> GateState {
        let results = self.results(ctx);
        if results.is_empty() {
            return GateState::Granted;
        }
        if ctx.is_loading() {
            return GateState::Loading;
        }

        let granted = match self.mode {
            MatchMode::All => results.iter().all(|ok| *ok),
            MatchMode::Any => results.iter().any(|ok| *ok),
        };
        if granted {
            GateState::Granted
        } else {
            GateState::Denied
        }
    }

    /// `children` when granted, `fallback` otherwise (including while loading)
    pub fn render<T>(
        &self,
        ctx: &PermissionContext,
        children: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        match self.evaluate(ctx) {
            GateState::Granted => children(),
            GateState::Loading | GateState::Denied => fallback(),
        }
    }

    /// Like [`render`](Self::render) with an empty fallback
    pub fn show<T>(&self, ctx: &PermissionContext, children: impl FnOnce() -> T) -> Option<T> {
        self.render(ctx, || Some(children()), || None)
    }
}
