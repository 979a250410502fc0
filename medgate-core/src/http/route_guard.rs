//! Permission guards - declarative endpoint protection
//!
//! A guard decides before the handler runs. Guards can be stacked in a
//! [`GuardChain`], which resolves the caller once and applies each guard in
//! order; any single guard can also check a request on its own.
//!
//! Example:
//! ```ignore
//! router.guarded(
//!     Method::DELETE,
//!     "/api/patients/*",
//!     vec![PermissionGuard::permission(Module::Patients, ModuleAction::Delete)],
//!     delete_patient,
//! );
//! ```

use crate::permissions::{Module, ModuleAction, Role};
use crate::rbac::{Caller, GuardError, RoleResolver};
use http::{HeaderMap, Method};

/// Single authorization requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionGuard {
    /// Role must hold `action` on `module`
    RequirePermission { module: Module, action: ModuleAction },

    /// Role must be one of `roles`
    RequireRole { roles: Vec<Role> },

    /// Role must hold any grant on `module`
    RequireModuleAccess { module: Module },
}

impl PermissionGuard {
    pub fn permission(module: Module, action: ModuleAction) -> Self {
        PermissionGuard::RequirePermission { module, action }
    }

    pub fn role(roles: impl IntoIterator<Item = Role>) -> Self {
        PermissionGuard::RequireRole { roles: roles.into_iter().collect() }
    }

    pub fn module(module: Module) -> Self {
        PermissionGuard::RequireModuleAccess { module }
    }

    /// Decide for an already-resolved caller, overrides included
    pub fn authorize(&self, caller: &Caller) -> Result<(), GuardError> {
        let role = caller.role;
        let effective = caller.permissions();
        match self {
            PermissionGuard::RequirePermission { module, action } => {
                if effective.can_perform_action(*module, *action) {
                    Ok(())
                } else {
                    Err(GuardError::InsufficientPermissions { role, module: *module, action: *action })
                }
            }
            PermissionGuard::RequireRole { roles } => {
                if roles.contains(&role) {
                    Ok(())
                } else {
                    Err(GuardError::InsufficientRole { role, required: roles.clone() })
                }
            }
            PermissionGuard::RequireModuleAccess { module } => {
                if effective.has_module_access(*module) {
                    Ok(())
                } else {
                    Err(GuardError::ModuleAccessDenied { role, module: *module })
                }
            }
        }
    }

    /// Resolve the caller of a request, then decide
    pub async fn check(&self, headers: &HeaderMap, resolver: &RoleResolver) -> Result<Caller, GuardError> {
        let caller = resolver.resolve(headers).await?;
        self.authorize(&caller)?;
        Ok(caller)
    }
}

/// Result of a guard chain check
#[derive(Debug)]
pub enum GuardResult {
    /// Request is allowed, continue to handler
    Allow(Caller),
    /// Request is denied, the handler must not run
    Deny(GuardError),
}

/// Ordered guards sharing one role resolution
#[derive(Debug, Clone, Default)]
pub struct GuardChain {
    guards: Vec<PermissionGuard>,
    audit: bool,
}

impl GuardChain {
    pub fn new(guards: Vec<PermissionGuard>) -> Self {
        Self { guards, audit: false }
    }

    /// Log every decision (denials at info/warn, grants at debug)
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = enabled;
        self
    }

    pub fn guards(&self) -> &[PermissionGuard] {
        &self.guards
    }

    pub async fn check(&self, headers: &HeaderMap, resolver: &RoleResolver) -> GuardResult {
        let caller = match resolver.resolve(headers).await {
            Ok(caller) => caller,
            Err(err) => {
                if self.audit {
                    log::info!("Access denied before authorization: {}", err);
                }
                return GuardResult::Deny(err);
            }
        };

        for guard in &self.guards {
            if let Err(err) = guard.authorize(&caller) {
                if self.audit {
                    log::info!("Access denied for subject '{}': {}", caller.subject, err);
                }
                return GuardResult::Deny(err);
            }
        }

        if self.audit {
            log::debug!(
                "Access granted to subject '{}' as '{}' ({} guards)",
                caller.subject,
                caller.role,
                self.guards.len()
            );
        }
        GuardResult::Allow(caller)
    }
}

/// Method + path pattern a route answers to
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    /// Exact path, or a prefix ending in `/*`
    pub pattern: String,
    pub method: Method,
}

impl RouteMatcher {
    pub fn new(method: Method, pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), method }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        &self.method == method && self.matches_path(path)
    }

    pub fn matches_path(&self, path: &str) -> bool {
        match self.pattern.strip_suffix("/*") {
            Some(prefix) => path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/')),
            None => path == self.pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PermissionOverrides;
    use crate::rbac::{HeaderIdentity, MemoryUserDirectory, UserRecord};
    use http::HeaderValue;
    use std::sync::Arc;

    fn resolver() -> RoleResolver {
        let directory = MemoryUserDirectory::with_users([
            UserRecord::new("admin", "super_admin"),
            UserRecord::new("doc", "doctor"),
            UserRecord::new("tech", "technician"),
        ]);
        RoleResolver::new(
            Arc::new(HeaderIdentity::from_name("x-user-id").unwrap()),
            Arc::new(directory),
        )
    }

    fn headers_for(subject: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_str(subject).unwrap());
        headers
    }

    #[test]
    fn test_authorize_permission() {
        let guard = PermissionGuard::permission(Module::Patients, ModuleAction::Delete);
        assert!(guard.authorize(&Caller::new("d", Role::Doctor)).is_ok());
        assert_eq!(
            guard.authorize(&Caller::new("t", Role::Technician)),
            Err(GuardError::InsufficientPermissions {
                role: Role::Technician,
                module: Module::Patients,
                action: ModuleAction::Delete,
            })
        );
    }

    #[test]
    fn test_authorize_role_and_module() {
        let admins = PermissionGuard::role([Role::SuperAdmin]);
        assert!(admins.authorize(&Caller::new("a", Role::SuperAdmin)).is_ok());
        assert!(matches!(
            admins.authorize(&Caller::new("d", Role::Doctor)),
            Err(GuardError::InsufficientRole { .. })
        ));

        let users = PermissionGuard::module(Module::Users);
        assert_eq!(
            users.authorize(&Caller::new("d", Role::Doctor)),
            Err(GuardError::ModuleAccessDenied { role: Role::Doctor, module: Module::Users })
        );
    }

    #[test]
    fn test_authorize_applies_overrides() {
        let delete = PermissionGuard::permission(Module::Patients, ModuleAction::Delete);
        let revoked = Caller::new("d", Role::Doctor)
            .with_overrides(PermissionOverrides::new().revoke(Module::Patients, ModuleAction::Delete));
        assert_eq!(
            delete.authorize(&revoked),
            Err(GuardError::InsufficientPermissions {
                role: Role::Doctor,
                module: Module::Patients,
                action: ModuleAction::Delete,
            })
        );

        let granted = Caller::new("t", Role::Technician)
            .with_overrides(PermissionOverrides::new().grant(Module::Analytics, ModuleAction::View));
        assert!(PermissionGuard::module(Module::Analytics).authorize(&granted).is_ok());
        assert!(PermissionGuard::permission(Module::Analytics, ModuleAction::Export)
            .authorize(&granted)
            .is_err());
    }

    #[tokio::test]
    async fn test_overrides_flow_from_directory_to_guard() {
        let directory = MemoryUserDirectory::with_users([UserRecord::new("doc", "doctor")
            .with_overrides(PermissionOverrides::new().revoke(Module::Patients, ModuleAction::Delete))]);
        let resolver = RoleResolver::new(
            Arc::new(HeaderIdentity::from_name("x-user-id").unwrap()),
            Arc::new(directory),
        );

        let delete = PermissionGuard::permission(Module::Patients, ModuleAction::Delete);
        assert!(matches!(
            delete.check(&headers_for("doc"), &resolver).await,
            Err(GuardError::InsufficientPermissions { .. })
        ));
        let edit = PermissionGuard::permission(Module::Patients, ModuleAction::Edit);
        assert!(edit.check(&headers_for("doc"), &resolver).await.is_ok());
    }

    #[tokio::test]
    async fn test_single_guard_check() {
        let guard = PermissionGuard::permission(Module::Patients, ModuleAction::Add);
        let caller = guard.check(&headers_for("tech"), &resolver()).await.unwrap();
        assert_eq!(caller.role, Role::Technician);

        let err = guard.check(&HeaderMap::new(), &resolver()).await.unwrap_err();
        assert_eq!(err, GuardError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_chain_first_failure_wins() {
        let chain = GuardChain::new(vec![
            PermissionGuard::role([Role::SuperAdmin, Role::Doctor]),
            PermissionGuard::permission(Module::Patients, ModuleAction::Delete),
        ]);

        assert!(matches!(chain.check(&headers_for("doc"), &resolver()).await, GuardResult::Allow(_)));
        match chain.check(&headers_for("tech"), &resolver()).await {
            GuardResult::Deny(GuardError::InsufficientRole { role, .. }) => {
                assert_eq!(role, Role::Technician)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_chain_still_requires_a_valid_caller() {
        let chain = GuardChain::default();
        assert!(matches!(
            chain.check(&HeaderMap::new(), &resolver()).await,
            GuardResult::Deny(GuardError::Unauthenticated)
        ));
        assert!(matches!(chain.check(&headers_for("admin"), &resolver()).await, GuardResult::Allow(_)));
    }

    #[test]
    fn test_pattern_matching() {
        let exact = RouteMatcher::new(Method::GET, "/api/roles");
        assert!(exact.matches(&Method::GET, "/api/roles"));
        assert!(!exact.matches(&Method::POST, "/api/roles"));
        assert!(!exact.matches(&Method::GET, "/api/roles/1"));

        let prefix = RouteMatcher::new(Method::DELETE, "/api/patients/*");
        assert!(prefix.matches(&Method::DELETE, "/api/patients/42"));
        assert!(!prefix.matches(&Method::DELETE, "/api/patients"));
        assert!(!prefix.matches(&Method::DELETE, "/api/patientsX/1"));
    }
}
