//! Medgate permission engine
//!
//! The declarative role table and the pure queries over it. The same
//! functions back the server guards ([`crate::http`]) and the client gate
//! ([`crate::gate`]); only the consequence of a `false` differs.
//!
//! # Example
//! ```rust,ignore
//! use medgate_core::permissions::{self, Module, ModuleAction};
//!
//! assert!(permissions::can_perform_action("doctor", Module::Patients, ModuleAction::Delete));
//! assert!(!permissions::has_module_access("doctor", Module::Users));
//! assert!(permissions::can_access_route("technician", "/add-patient"));
//! ```

mod overrides;
mod routes;
mod service;
mod summary;
mod table;
mod types;

pub use overrides::{EffectivePermissions, PermissionOverrides};
pub use routes::{can_access_route, find_route, ProtectedRoute, PROTECTED_ROUTES};
pub use service::{
    all_roles, allowed_actions, allowed_sidebar_menus, can_access_sidebar_menu,
    can_perform_action, has_module_access, is_valid_role, parse_role, role_config,
};
pub use summary::{summarize, PermissionsSummary};
pub use table::{Permission, RoleConfig, ROLE_PERMISSIONS};
pub use types::{Module, ModuleAction, ParseKeyError, Role, SidebarMenu};
