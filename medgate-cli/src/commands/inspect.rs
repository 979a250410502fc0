//! Read-only queries over the role table

use medgate_core::permissions::{self, Module, ModuleAction, Role};
use std::fmt::Write;

fn parse_role(role: &str) -> Result<Role, String> {
    role.parse().map_err(|e| format!("{} (expected one of: {})", e, role_names()))
}

fn role_names() -> String {
    Role::ALL.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
}

fn join<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items.into_iter().map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
}

pub fn roles() -> String {
    let mut out = String::new();
    for role in permissions::all_roles() {
        if let Some(config) = role.config() {
            let _ = writeln!(out, "{:<12} {:<12} {}", role, config.name, config.description);
        }
    }
    out.trim_end().to_string()
}

pub fn show(role: &str, json: bool) -> Result<String, String> {
    let role = parse_role(role)?;
    let summary =
        permissions::summarize(role).ok_or_else(|| format!("role '{}' has no table entry", role))?;

    if json {
        return serde_json::to_string_pretty(&summary).map_err(|e| e.to_string());
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", summary.role_name, summary.role);
    let _ = writeln!(out, "  {}", summary.role_description);
    let _ = writeln!(out, "  menus: {}", join(summary.sidebar_menus));
    for permission in summary.permissions {
        let _ = writeln!(out, "  {:<14} {}", permission.module, join(permission.actions));
    }
    Ok(out.trim_end().to_string())
}

pub fn check(role: &str, module: &str, action: &str) -> Result<String, String> {
    let module: Module = module.parse().map_err(|e| format!("{}", e))?;
    let action: ModuleAction = action.parse().map_err(|e| format!("{}", e))?;

    // unknown roles are reported as denied, not rejected
    let verdict = if permissions::can_perform_action(role, module, action) { "allowed" } else { "denied" };
    Ok(format!("{}: {} {}:{}", verdict, role, module, action))
}

pub fn route(role: &str, path: &str) -> String {
    let verdict = if permissions::can_access_route(role, path) { "allowed" } else { "denied" };
    match permissions::find_route(path) {
        Some(_) => format!("{}: {} {}", verdict, role, path),
        None => format!("{}: {} {} (unprotected)", verdict, role, path),
    }
}
