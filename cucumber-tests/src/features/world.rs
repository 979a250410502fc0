use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use cucumber::World as CucumberWorld;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use medgate_core::gate::{PermissionContext, PermissionGate, ScreenOutcome};
use medgate_core::http::{ok_json, ApiRouter, PermissionGuard};
use medgate_core::permissions::{Module, ModuleAction};
use medgate_core::rbac::{
    HeaderIdentity, MemoryUserDirectory, ResolutionPolicy, RoleResolver, UserDirectory, UserRecord,
};
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// User directory whose backing store is down
pub struct OutageDirectory;

#[async_trait]
impl UserDirectory for OutageDirectory {
    async fn get_user(&self, _id: &str) -> anyhow::Result<Option<UserRecord>> {
        Err(anyhow!("user store unreachable"))
    }
}

/// Endpoint registered by a scenario, guarded by one permission
#[derive(Debug, Clone)]
pub struct GuardedEndpoint {
    pub method: Method,
    pub pattern: String,
    pub module: Module,
    pub action: ModuleAction,
}

#[derive(CucumberWorld)]
#[world(init = Self::new)]
pub struct MedgateWorld {
    pub directory: MemoryUserDirectory,
    pub directory_down: bool,
    pub policy: ResolutionPolicy,
    pub endpoints: Vec<GuardedEndpoint>,
    pub handler_hits: Arc<AtomicUsize>,

    pub last_status: Option<StatusCode>,
    pub last_body: Value,
    pub last_answer: Option<bool>,

    pub context: PermissionContext,
    pub gate: PermissionGate,
    pub screen: Option<ScreenOutcome<String>>,
}

impl fmt::Debug for MedgateWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MedgateWorld")
            .field("directory_down", &self.directory_down)
            .field("policy", &self.policy)
            .field("endpoints", &self.endpoints)
            .field("last_status", &self.last_status)
            .field("last_answer", &self.last_answer)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl MedgateWorld {
    pub fn new() -> Self {
        Self {
            directory: MemoryUserDirectory::new(),
            directory_down: false,
            policy: ResolutionPolicy::FailClosed,
            endpoints: Vec::new(),
            handler_hits: Arc::new(AtomicUsize::new(0)),
            last_status: None,
            last_body: Value::Null,
            last_answer: None,
            context: PermissionContext::loading(),
            gate: PermissionGate::new(),
            screen: None,
        }
    }

    /// Router reflecting the scenario's current setup
    pub fn router(&self) -> ApiRouter {
        let directory: Arc<dyn UserDirectory> = if self.directory_down {
            Arc::new(OutageDirectory)
        } else {
            Arc::new(self.directory.clone())
        };
        let extractor = Arc::new(HeaderIdentity::new(http::HeaderName::from_static("x-user-id")));
        let resolver = RoleResolver::new(extractor, directory).with_policy(self.policy);

        let mut router = ApiRouter::new(resolver).with_audit(true).with_permission_routes();
        for endpoint in &self.endpoints {
            let hits = self.handler_hits.clone();
            router = router.guarded(
                endpoint.method.clone(),
                endpoint.pattern.clone(),
                vec![PermissionGuard::permission(endpoint.module, endpoint.action)],
                move |_req, caller| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Ok(ok_json(&json!({ "handledBy": caller.subject })))
                    }
                },
            );
        }
        router
    }

    pub async fn send(&mut self, method: Method, path: &str, subject: Option<&str>) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(subject) = subject {
            builder = builder.header("x-user-id", subject);
        }
        let request = builder.body(Bytes::new()).expect("valid test request");

        let response = self.router().handle(request).await;
        self.last_status = Some(response.status());
        let bytes = response.into_body().collect().await.expect("in-memory body").to_bytes();
        self.last_body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    }

    pub fn hits(&self) -> usize {
        self.handler_hits.load(Ordering::SeqCst)
    }
}

impl Default for MedgateWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `module:action`
pub fn parse_permission(spec: &str) -> (Module, ModuleAction) {
    let (module, action) = spec.split_once(':').expect("permission as module:action");
    (
        module.parse().expect("declared module"),
        action.parse().expect("declared action"),
    )
}

pub fn parse_answer(answer: &str) -> bool {
    match answer {
        "yes" => true,
        "no" => false,
        other => panic!("expected yes or no, got '{}'", other),
    }
}
