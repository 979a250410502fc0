//! Built-in permission endpoints
//!
//! - `GET /health` (public)
//! - `GET /api/permissions/me` - bootstrap summary for the caller's role and overrides
//! - `GET /api/permissions/check?module=&action=` - one action check
//! - `GET /api/permissions/route?path=` - whole-page access check
//! - `GET /api/roles` - assignable roles, requires `users:view`

use super::error::bad_request;
use super::response::{ok_json, query_param, Req, Resp};
use super::route_guard::PermissionGuard;
use super::router::ApiRouter;
use crate::permissions::{self, summarize, Module, ModuleAction};
use crate::rbac::Caller;
use anyhow::anyhow;
use http::Method;
use serde_json::json;

impl ApiRouter {
    /// Mount the permission introspection endpoints
    pub fn with_permission_routes(self) -> Self {
        self.public(Method::GET, "/health", health)
            .guarded(Method::GET, "/api/permissions/me", vec![], my_permissions)
            .guarded(Method::GET, "/api/permissions/check", vec![], check_action)
            .guarded(Method::GET, "/api/permissions/route", vec![], check_route)
            .guarded(
                Method::GET,
                "/api/roles",
                vec![PermissionGuard::permission(Module::Users, ModuleAction::View)],
                list_roles,
            )
    }
}

async fn health(_req: Req) -> anyhow::Result<Resp> {
    Ok(ok_json(&json!({ "status": "ok" })))
}

async fn my_permissions(_req: Req, caller: Caller) -> anyhow::Result<Resp> {
    let summary = summarize(caller.role)
        .ok_or_else(|| anyhow!("role '{}' has no table entry", caller.role))?
        .with_overrides(caller.overrides.clone());
    Ok(ok_json(&summary))
}

async fn check_action(req: Req, caller: Caller) -> anyhow::Result<Resp> {
    let module = query_param(&req, "module").and_then(|m| m.parse::<Module>().ok());
    let action = query_param(&req, "action").and_then(|a| a.parse::<ModuleAction>().ok());

    let (Some(module), Some(action)) = (module, action) else {
        return Ok(bad_request("Query parameters 'module' and 'action' must name a declared module and action"));
    };

    Ok(ok_json(&json!({
        "role": caller.role,
        "module": module,
        "action": action,
        "allowed": caller.permissions().can_perform_action(module, action),
    })))
}

async fn check_route(req: Req, caller: Caller) -> anyhow::Result<Resp> {
    let Some(path) = query_param(&req, "path") else {
        return Ok(bad_request("Query parameter 'path' is required"));
    };

    let route = permissions::find_route(&path);
    let allowed = route.map_or(true, |r| r.permits(&caller.permissions()));

    Ok(ok_json(&json!({
        "role": caller.role,
        "allowed": allowed,
        "protected": route.is_some(),
        "path": path,
    })))
}

async fn list_roles(_req: Req, _caller: Caller) -> anyhow::Result<Resp> {
    let roles: Vec<_> = permissions::all_roles()
        .into_iter()
        .filter_map(|role| {
            role.config().map(|config| {
                json!({
                    "role": role,
                    "name": config.name,
                    "description": config.description,
                })
            })
        })
        .collect();

    Ok(ok_json(&roles))
}
