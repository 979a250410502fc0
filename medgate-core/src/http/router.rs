//! Guarded API router
//!
//! Routes are tried in registration order. For a guarded route, the guard
//! chain runs to completion before the handler future is even created, so a
//! rejected request never reaches business code.

use super::error::{guard_error, internal_error, method_not_allowed, not_found};
use super::response::{Req, Resp};
use super::route_guard::{GuardChain, GuardResult, PermissionGuard, RouteMatcher};
use crate::rbac::{Caller, RoleResolver};
use futures::future::{BoxFuture, FutureExt};
use http::Method;
use std::future::Future;
use std::sync::Arc;

pub type Handler = Arc<dyn Fn(Req, Caller) -> BoxFuture<'static, anyhow::Result<Resp>> + Send + Sync>;
pub type PublicHandler = Arc<dyn Fn(Req) -> BoxFuture<'static, anyhow::Result<Resp>> + Send + Sync>;

enum Endpoint {
    Guarded { chain: GuardChain, handler: Handler },
    Public(PublicHandler),
}

struct Route {
    matcher: RouteMatcher,
    endpoint: Endpoint,
}

pub struct ApiRouter {
    routes: Vec<Route>,
    resolver: RoleResolver,
    audit: bool,
}

impl ApiRouter {
    pub fn new(resolver: RoleResolver) -> Self {
        Self { routes: Vec::new(), resolver, audit: false }
    }

    /// Log guard decisions for routes registered after this call
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = enabled;
        self
    }

    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    /// Register a route whose handler only runs once every guard passes
    ///
    /// An empty guard list still requires an authenticated caller with a
    /// valid role.
    pub fn guarded<F, Fut>(
        mut self,
        method: Method,
        pattern: impl Into<String>,
        guards: Vec<PermissionGuard>,
        handler: F,
    ) -> Self
    where
        F: Fn(Req, Caller) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |req, caller| handler(req, caller).boxed());
        self.routes.push(Route {
            matcher: RouteMatcher::new(method, pattern),
            endpoint: Endpoint::Guarded {
                chain: GuardChain::new(guards).with_audit(self.audit),
                handler,
            },
        });
        self
    }

    /// Register a route that skips caller resolution entirely
    pub fn public<F, Fut>(mut self, method: Method, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
    {
        let handler: PublicHandler = Arc::new(move |req| handler(req).boxed());
        self.routes.push(Route {
            matcher: RouteMatcher::new(method, pattern),
            endpoint: Endpoint::Public(handler),
        });
        self
    }

    /// Guards registered for `method` + `path`, if any route matches
    pub fn guards_for(&self, method: &Method, path: &str) -> Option<&[PermissionGuard]> {
        self.routes.iter().find(|r| r.matcher.matches(method, path)).map(|r| match &r.endpoint {
            Endpoint::Guarded { chain, .. } => chain.guards(),
            Endpoint::Public(_) => &[][..],
        })
    }

    pub async fn handle(&self, req: Req) -> Resp {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let Some(route) = self.routes.iter().find(|r| r.matcher.matches(&method, &path)) else {
            let allowed: Vec<&str> = self
                .routes
                .iter()
                .filter(|r| r.matcher.matches_path(&path))
                .map(|r| r.matcher.method.as_str())
                .collect();
            return if allowed.is_empty() {
                not_found()
            } else {
                method_not_allowed(&allowed.join(", "))
            };
        };

        let result = match &route.endpoint {
            Endpoint::Public(handler) => handler(req).await,
            Endpoint::Guarded { chain, handler } => {
                let decision = chain.check(req.headers(), &self.resolver).await;
                match decision {
                    GuardResult::Allow(caller) => handler(req, caller).await,
                    GuardResult::Deny(err) => return guard_error(&err),
                }
            }
        };

        result.unwrap_or_else(|e| {
            log::error!("Handler for {} {} failed: {:#}", method, path, e);
            internal_error()
        })
    }
}
