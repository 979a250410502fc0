//! Enforcement failure taxonomy
//!
//! Every variant is terminal for the request it occurs on. Status codes and
//! the JSON envelope clients rely on are defined here; rendering into an HTTP
//! response lives in [`crate::http::error`].

use crate::permissions::{Module, ModuleAction, Role};
use http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// No identity attached to the request
    #[error("authentication required")]
    Unauthenticated,

    /// Role claim missing or not a declared role
    #[error("invalid role {role:?} for subject '{subject}'")]
    InvalidRole { subject: String, role: Option<String> },

    /// Valid role, grant absent
    #[error("role '{role}' cannot perform '{action}' on '{module}'")]
    InsufficientPermissions { role: Role, module: Module, action: ModuleAction },

    #[error("role '{role}' is not one of {required:?}")]
    InsufficientRole { role: Role, required: Vec<Role> },

    #[error("role '{role}' has no access to module '{module}'")]
    ModuleAccessDenied { role: Role, module: Module },

    /// User directory unavailable and the resolution policy fails closed
    #[error("role resolution unavailable for subject '{subject}': {reason}")]
    ResolutionUnavailable { subject: String, reason: String },

    /// Unexpected failure; the reason is logged, never sent to the caller
    #[error("internal error during permission check: {0}")]
    Internal(String),
}

impl GuardError {
    pub fn status(&self) -> StatusCode {
        match self {
            GuardError::Unauthenticated => StatusCode::UNAUTHORIZED,
            GuardError::InvalidRole { .. }
            | GuardError::InsufficientPermissions { .. }
            | GuardError::InsufficientRole { .. }
            | GuardError::ModuleAccessDenied { .. } => StatusCode::FORBIDDEN,
            GuardError::ResolutionUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GuardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short error label used as the `error` field of the envelope
    pub fn label(&self) -> &'static str {
        match self {
            GuardError::Unauthenticated => "Authentication required",
            GuardError::InvalidRole { .. } => "Invalid role",
            GuardError::InsufficientPermissions { .. } => "Insufficient permissions",
            GuardError::InsufficientRole { .. } => "Insufficient role",
            GuardError::ModuleAccessDenied { .. } => "Module access denied",
            GuardError::ResolutionUnavailable { .. } => "Role resolution unavailable",
            GuardError::Internal(_) => "Internal server error",
        }
    }

    /// JSON body sent to the client
    ///
    /// Role names are not secret, so permission denials name the role seen
    /// and the requirement that failed.
    pub fn body(&self) -> Value {
        let label = self.label();
        match self {
            GuardError::Unauthenticated => json!({
                "error": label,
                "message": "Please log in to access this resource",
            }),
            GuardError::InvalidRole { .. } => json!({
                "error": label,
                "message": "Your account has no recognized role",
            }),
            GuardError::InsufficientPermissions { role, module, action } => json!({
                "error": label,
                "message": format!("You do not have permission to {} {}", action, module),
                "requiredPermission": { "module": module, "action": action },
                "userRole": role,
            }),
            GuardError::InsufficientRole { role, required } => json!({
                "error": label,
                "message": "Your role does not allow access to this resource",
                "userRole": role,
                "requiredRoles": required,
            }),
            GuardError::ModuleAccessDenied { role, module } => json!({
                "error": label,
                "message": format!("You do not have access to the {} module", module),
                "userRole": role,
                "module": module,
            }),
            GuardError::ResolutionUnavailable { .. } => json!({
                "error": label,
                "message": "Unable to verify permissions right now, please retry",
            }),
            GuardError::Internal(_) => json!({
                "error": label,
                "message": "Permission check failed",
            }),
        }
    }
}
