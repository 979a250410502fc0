//! Client-side permission gating
//!
//! A UX layer over the same permission queries the server enforces with. It
//! decides what to show, never what is allowed: every gated action must also
//! sit behind a server guard.
//!
//! - [`PermissionContext`]: the current role plus bound queries
//! - [`PermissionGate`]: declarative requirements with all/any matching
//! - [`Protected`]: whole-screen wrapper with loading and access-denied states

mod component;
mod context;
mod screen;

pub use component::{GateState, MatchMode, PermissionGate};
pub use context::{PermissionContext, RoleState};
pub use screen::{protect, Protected, Screen, ScreenOutcome};
