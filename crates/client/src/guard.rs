use sitedesk_db::models::Role;

use crate::context::AuthState;

/// What the navigation layer should do with a request for a protected
/// view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    RedirectToFallback,
}

/// Pure function of (auth state, required roles); navigation is the
/// caller's side effect.
pub fn check(state: &AuthState, required: &[Role]) -> RouteDecision {
    match state {
        AuthState::Unauthenticated => RouteDecision::RedirectToLogin,
        AuthState::Authenticated(session) => {
            if required.contains(&session.role) {
                RouteDecision::Allow
            } else {
                RouteDecision::RedirectToFallback
            }
        }
    }
}
