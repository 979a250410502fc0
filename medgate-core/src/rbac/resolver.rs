//! Caller role resolution
//!
//! identity → user record → validated [`Role`]. Runs once per request with
//! no caching, so role changes apply on the very next request.

use super::context::Caller;
use super::error::GuardError;
use super::traits::{IdentityExtractor, UserDirectory};
use crate::permissions::{parse_role, PermissionOverrides, Role};
use http::HeaderMap;
use std::sync::Arc;

/// What to do when the user directory cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Reject the request with 503
    #[default]
    FailClosed,
    /// Continue as `role`. Logged at warn on every use: a directory outage
    /// grants this role to every authenticated caller.
    Fallback(Role),
}

#[derive(Clone)]
pub struct RoleResolver {
    extractor: Arc<dyn IdentityExtractor>,
    directory: Arc<dyn UserDirectory>,
    policy: ResolutionPolicy,
}

impl RoleResolver {
    pub fn new(extractor: Arc<dyn IdentityExtractor>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { extractor, directory, policy: ResolutionPolicy::default() }
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Caller, GuardError> {
        let identity = self
            .extractor
            .extract(headers)
            .await
            .map_err(|e| {
                log::error!("Identity extraction via '{}' failed: {:#}", self.extractor.name(), e);
                GuardError::Internal(e.to_string())
            })?
            .ok_or(GuardError::Unauthenticated)?;

        let subject = identity.subject;

        let (claim, overrides) = match self.directory.get_user(&subject).await {
            Ok(Some(user)) => (user.role, user.overrides),
            Ok(None) => {
                log::warn!("Authenticated subject '{}' has no user record", subject);
                return Err(GuardError::InvalidRole { subject, role: None });
            }
            Err(e) => match self.policy {
                ResolutionPolicy::FailClosed => {
                    log::error!("User lookup for '{}' failed: {:#}", subject, e);
                    return Err(GuardError::ResolutionUnavailable { subject, reason: e.to_string() });
                }
                ResolutionPolicy::Fallback(role) => {
                    log::warn!(
                        "User lookup for '{}' failed ({:#}), continuing with fallback role '{}'",
                        subject,
                        e,
                        role
                    );
                    (role.as_str().to_string(), PermissionOverrides::default())
                }
            },
        };

        match parse_role(&claim) {
            Some(role) => Ok(Caller::new(subject, role).with_overrides(overrides)),
            None => {
                log::warn!("Subject '{}' carries unknown role '{}'", subject, claim);
                Err(GuardError::InvalidRole { subject, role: Some(claim) })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::rbac::context::UserRecord;
    use crate::rbac::directory::MemoryUserDirectory;
    use crate::rbac::providers::HeaderIdentity;
    use anyhow::{anyhow, Result};
    use http::HeaderValue;

    pub(crate) struct UnavailableDirectory;

    #[async_trait::async_trait]
    impl UserDirectory for UnavailableDirectory {
        async fn get_user(&self, _id: &str) -> Result<Option<UserRecord>> {
            Err(anyhow!("connection refused"))
        }
    }

    fn headers_for(subject: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_str(subject).unwrap());
        headers
    }

    fn resolver(directory: Arc<dyn UserDirectory>) -> RoleResolver {
        RoleResolver::new(Arc::new(HeaderIdentity::from_name("x-user-id").unwrap()), directory)
    }

    fn directory() -> Arc<MemoryUserDirectory> {
        Arc::new(MemoryUserDirectory::with_users([
            UserRecord::new("doc", "doctor"),
            UserRecord::new("forged", "root"),
        ]))
    }

    #[tokio::test]
    async fn test_resolves_valid_role() {
        let caller = resolver(directory()).resolve(&headers_for("doc")).await.unwrap();
        assert_eq!(caller, Caller::new("doc", Role::Doctor));
    }

    #[tokio::test]
    async fn test_caller_carries_user_overrides() {
        use crate::permissions::{Module, ModuleAction};

        let overrides = PermissionOverrides::new().revoke(Module::Patients, ModuleAction::Delete);
        let directory = Arc::new(MemoryUserDirectory::with_users([
            UserRecord::new("doc", "doctor").with_overrides(overrides.clone())
        ]));
        let caller = resolver(directory).resolve(&headers_for("doc")).await.unwrap();
        assert_eq!(caller.overrides, overrides);
        assert!(!caller.permissions().can_perform_action(Module::Patients, ModuleAction::Delete));
        assert!(caller.permissions().can_perform_action(Module::Patients, ModuleAction::Edit));
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthenticated() {
        let err = resolver(directory()).resolve(&HeaderMap::new()).await.unwrap_err();
        assert_eq!(err, GuardError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_unknown_role_is_invalid() {
        let err = resolver(directory()).resolve(&headers_for("forged")).await.unwrap_err();
        assert_eq!(
            err,
            GuardError::InvalidRole { subject: "forged".into(), role: Some("root".into()) }
        );
    }

    #[tokio::test]
    async fn test_missing_user_is_invalid() {
        let err = resolver(directory()).resolve(&headers_for("ghost")).await.unwrap_err();
        assert_eq!(err, GuardError::InvalidRole { subject: "ghost".into(), role: None });
    }

    #[tokio::test]
    async fn test_directory_outage_fails_closed_by_default() {
        let err = resolver(Arc::new(UnavailableDirectory))
            .resolve(&headers_for("doc"))
            .await
            .unwrap_err();
        assert!(matches!(err, GuardError::ResolutionUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_directory_outage_with_fallback() {
        let caller = resolver(Arc::new(UnavailableDirectory))
            .with_policy(ResolutionPolicy::Fallback(Role::Technician))
            .resolve(&headers_for("doc"))
            .await
            .unwrap();
        assert_eq!(caller.role, Role::Technician);
    }

    #[tokio::test]
    async fn test_role_change_applies_to_next_request() {
        let directory = directory();
        let resolver = resolver(directory.clone());
        assert_eq!(resolver.resolve(&headers_for("doc")).await.unwrap().role, Role::Doctor);

        directory.assign_role("doc", "technician").await;
        assert_eq!(resolver.resolve(&headers_for("doc")).await.unwrap().role, Role::Technician);
    }
}
