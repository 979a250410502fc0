//! Common imports
//!
//! ```rust,ignore
//! use medgate_core::prelude::*;
//! ```

// === Server builder ===
pub use crate::app::{MedgateServer, MedgateServerBuilder};

// === Configuration ===
pub use crate::config::{LoggingConfig, MedgateConfig};

// === Permission table and queries ===
pub use crate::permissions::{
    can_access_route, can_access_sidebar_menu, can_perform_action, has_module_access,
    EffectivePermissions, Module, ModuleAction, PermissionOverrides, Role, SidebarMenu,
};

// === Server enforcement ===
pub use crate::http::{ok_json, ApiRouter, GuardChain, PermissionGuard, Req, Resp};
pub use crate::rbac::{
    Caller, GuardError, MemoryUserDirectory, ResolutionPolicy, RoleResolver, UserRecord,
};
pub use ::http::Method;

// === Client gate ===
pub use crate::gate::{GateState, MatchMode, PermissionContext, PermissionGate, RoleState};
