//! Whole-screen protection

use super::component::{GateState, PermissionGate};
use super::context::PermissionContext;

/// Anything that renders a full screen from the current permissions
pub trait Screen {
    type Output;

    fn render(&self, ctx: &PermissionContext) -> Self::Output;
}

impl<F, T> Screen for F
where
    F: Fn(&PermissionContext) -> T,
{
    type Output = T;

    fn render(&self, ctx: &PermissionContext) -> T {
        self(ctx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenOutcome<T> {
    /// Neutral placeholder while the role resolves
    Loading,
    /// Blocking "Access Denied" placeholder
    AccessDenied,
    Rendered(T),
}

impl<T> ScreenOutcome<T> {
    pub fn rendered(self) -> Option<T> {
        match self {
            ScreenOutcome::Rendered(output) => Some(output),
            ScreenOutcome::Loading | ScreenOutcome::AccessDenied => None,
        }
    }
}

/// A screen that only renders once its gate grants
pub struct Protected<S> {
    screen: S,
    gate: PermissionGate,
}

impl<S: Screen> Protected<S> {
    pub fn new(screen: S, gate: PermissionGate) -> Self {
        Self { screen, gate }
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    pub fn render(&self, ctx: &PermissionContext) -> ScreenOutcome<S::Output> {
        match self.gate.evaluate(ctx) {
            GateState::Loading => ScreenOutcome::Loading,
            GateState::Denied => ScreenOutcome::AccessDenied,
            GateState::Granted => ScreenOutcome::Rendered(self.screen.render(ctx)),
        }
    }
}

/// Wrap `screen` behind `gate`
pub fn protect<S: Screen>(screen: S, gate: PermissionGate) -> Protected<S> {
    Protected::new(screen, gate)
}
