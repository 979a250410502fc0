//! Builder for MedgateServer

use super::MedgateServer;
use crate::config::{IdentitySource, MedgateConfig};
use crate::http::ApiRouter;
use crate::rbac::{
    HeaderIdentity, IdentityExtractor, ResolutionPolicy, RoleResolver, SessionIdentity,
    UserDirectory,
};
use crate::session::{MemorySessionStore, SessionStore};
use anyhow::{Context, Result};
use std::sync::Arc;

type RouteSetup = Box<dyn FnOnce(ApiRouter) -> ApiRouter + Send>;

pub struct MedgateServerBuilder {
    config: MedgateConfig,
    directory: Option<Arc<dyn UserDirectory>>,
    session_store: Option<Arc<dyn SessionStore>>,
    identity: Option<Arc<dyn IdentityExtractor>>,
    policy: Option<ResolutionPolicy>,
    permission_routes: bool,
    routes: Vec<RouteSetup>,
}

impl Default for MedgateServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MedgateServerBuilder {
    /// Start from `medgate.toml` + environment, or defaults if that fails
    pub fn new() -> Self {
        let config = MedgateConfig::load().unwrap_or_else(|e| {
            log::warn!("Falling back to default configuration: {:#}", e);
            MedgateConfig::default()
        });
        Self::with_config(config)
    }

    pub fn with_config(config: MedgateConfig) -> Self {
        Self {
            config,
            directory: None,
            session_store: None,
            identity: None,
            policy: None,
            permission_routes: true,
            routes: Vec::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Source of each subject's current role (required)
    pub fn with_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Session store used when `rbac.identity_source = "session"`
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Replace the configured identity source entirely
    pub fn with_identity(mut self, extractor: Arc<dyn IdentityExtractor>) -> Self {
        self.identity = Some(extractor);
        self
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Skip the built-in `/health` and `/api/permissions/*` endpoints
    pub fn without_permission_routes(mut self) -> Self {
        self.permission_routes = false;
        self
    }

    /// Register application routes on the router
    pub fn with_routes<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(ApiRouter) -> ApiRouter + Send + 'static,
    {
        self.routes.push(Box::new(setup));
        self
    }

    pub fn config(&self) -> &MedgateConfig {
        &self.config
    }

    fn identity_extractor(&self) -> Result<Arc<dyn IdentityExtractor>> {
        if let Some(extractor) = &self.identity {
            return Ok(extractor.clone());
        }

        let extractor: Arc<dyn IdentityExtractor> = match self.config.rbac.identity_source {
            IdentitySource::Header => {
                Arc::new(HeaderIdentity::from_name(&self.config.rbac.identity_header)?)
            }
            IdentitySource::Session => {
                let store: Arc<dyn SessionStore> = match &self.session_store {
                    Some(store) => store.clone(),
                    None => {
                        log::warn!("No session store provided, sessions are kept in memory");
                        Arc::new(MemorySessionStore::new())
                    }
                };
                Arc::new(SessionIdentity::new(store, self.config.sessions.to_session_config()))
            }
        };
        Ok(extractor)
    }

    pub fn build_resolver(&self) -> Result<RoleResolver> {
        let directory = self
            .directory
            .clone()
            .context("A user directory is required to resolve caller roles")?;
        let policy = self.policy.unwrap_or_else(|| self.config.rbac.policy());

        if let ResolutionPolicy::Fallback(role) = policy {
            log::warn!(
                "Role resolution falls back to '{}' when the user directory is unavailable",
                role
            );
        }

        Ok(RoleResolver::new(self.identity_extractor()?, directory).with_policy(policy))
    }

    pub fn build(mut self) -> Result<MedgateServer> {
        self.config.validate().context("Invalid medgate configuration")?;

        // the resolver and the cleanup task must share one store
        let sweep_sessions =
            self.identity.is_none() && self.config.rbac.identity_source == IdentitySource::Session;
        if sweep_sessions && self.session_store.is_none() {
            log::warn!("No session store provided, sessions are kept in memory");
            self.session_store = Some(Arc::new(MemorySessionStore::new()));
        }
        let session_store = if sweep_sessions { self.session_store.clone() } else { None };

        let mut router =
            ApiRouter::new(self.build_resolver()?).with_audit(self.config.rbac.audit_decisions);
        if self.permission_routes {
            router = router.with_permission_routes();
        }
        for setup in self.routes {
            router = setup(router);
        }

        Ok(MedgateServer { config: self.config, router: Arc::new(router), session_store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolutionMode;
    use crate::permissions::Role;
    use crate::rbac::MemoryUserDirectory;
    use http::Method;

    fn directory() -> Arc<dyn UserDirectory> {
        Arc::new(MemoryUserDirectory::new())
    }

    #[test]
    fn test_directory_is_required() {
        let builder = MedgateServerBuilder::with_config(MedgateConfig::default());
        assert!(builder.build_resolver().is_err());
    }

    #[test]
    fn test_policy_from_config_and_override() {
        let mut config = MedgateConfig::default();
        config.rbac.resolution = ResolutionMode::Fallback;
        config.rbac.fallback_role = Some("technician".to_string());

        let builder = MedgateServerBuilder::with_config(config).with_directory(directory());
        assert_eq!(
            builder.build_resolver().unwrap().policy(),
            ResolutionPolicy::Fallback(Role::Technician)
        );

        let builder = builder.with_policy(ResolutionPolicy::FailClosed);
        assert_eq!(builder.build_resolver().unwrap().policy(), ResolutionPolicy::FailClosed);
    }

    #[test]
    fn test_invalid_config_fails_build() {
        let mut config = MedgateConfig::default();
        config.rbac.resolution = ResolutionMode::Fallback;
        let result = MedgateServerBuilder::with_config(config).with_directory(directory()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_routes_are_mounted() {
        let server = MedgateServerBuilder::with_config(MedgateConfig::default())
            .with_port(9000)
            .with_directory(directory())
            .with_routes(|router| {
                router.public(Method::GET, "/version", |_req| async {
                    Ok(crate::http::ok_json(&"0.1.0"))
                })
            })
            .build()
            .unwrap();

        let router = server.router();
        assert_eq!(server.config().server.port, 9000);
        assert!(router.guards_for(&Method::GET, "/version").is_some());
        assert!(router.guards_for(&Method::GET, "/api/roles").is_some());
        assert!(router.guards_for(&Method::GET, "/health").is_some());
    }

    #[test]
    fn test_session_identity_source() {
        let mut config = MedgateConfig::default();
        config.rbac.identity_source = IdentitySource::Session;
        let server = MedgateServerBuilder::with_config(config)
            .with_directory(directory())
            .with_session_store(Arc::new(MemorySessionStore::new()))
            .without_permission_routes()
            .build()
            .unwrap();
        assert!(server.router().guards_for(&Method::GET, "/health").is_none());
        assert!(server.session_store().is_some());
    }

    #[test]
    fn test_header_identity_has_no_session_store() {
        let server = MedgateServerBuilder::with_config(MedgateConfig::default())
            .with_directory(directory())
            .with_session_store(Arc::new(MemorySessionStore::new()))
            .build()
            .unwrap();
        assert!(server.session_store().is_none());
    }

    #[tokio::test]
    async fn test_built_server_shares_session_store_with_resolver() {
        use crate::session::Session;
        use chrono::{Duration, Utc};

        let mut config = MedgateConfig::default();
        config.rbac.identity_source = IdentitySource::Session;
        let server = MedgateServerBuilder::with_config(config)
            .with_directory(directory())
            .build()
            .unwrap();

        let store = server.session_store().unwrap();
        store.set(Session::new("old", "doc", Utc::now() - Duration::seconds(1))).await.unwrap();
        let handle = crate::session::spawn_cleanup(store.clone(), std::time::Duration::from_millis(10));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        handle.abort();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
