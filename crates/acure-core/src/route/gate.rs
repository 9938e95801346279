//! Auth gate: decides whether a route may render.

use super::navigation::NavigationDispatcher;
use super::table::{DASHBOARD_PATH, LOGIN_PATH, Route, UNAUTHENTICATED_ONLY_PATHS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Rendering is blocked and the user should be sent to this path.
    Redirect(&'static str),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate;

impl AuthGate {
    /// Pure decision for `route` reached at `current_path`.
    pub fn check(route: &Route, current_path: &str, has_token: bool) -> GateDecision {
        if route.requires_auth && !has_token {
            return GateDecision::Redirect(LOGIN_PATH);
        }

        if !route.requires_auth && has_token && UNAUTHENTICATED_ONLY_PATHS.contains(&current_path) {
            return GateDecision::Redirect(DASHBOARD_PATH);
        }

        GateDecision::Allow
    }

    /// Runs [`AuthGate::check`] and navigates on a redirect.
    ///
    /// Returns `true` when the route may render.
    pub fn enforce(
        dispatcher: &NavigationDispatcher,
        route: &Route,
        current_path: &str,
        has_token: bool,
    ) -> bool {
        match Self::check(route, current_path, has_token) {
            GateDecision::Allow => true,
            GateDecision::Redirect(target) => {
                tracing::debug!(
                    "Auth gate blocked {} (requires_auth: {}), redirecting to {}",
                    route.path,
                    route.requires_auth,
                    target
                );
                dispatcher.navigate(target);
                false
            }
        }
    }
}
