// ── Navigation guard ──
//
// Runs before every route transition. The auth state is derived from the
// session store each time; nothing is cached between transitions.

use std::sync::Arc;

use enrolly_api::SessionStore;
use tracing::debug;

/// Route of the login view.
pub const LOGIN_PATH: &str = "/login";

/// Login status as seen by one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Proceed to the requested path.
    Allow,
    /// Cancel the requested navigation and go here instead.
    Redirect(String),
}

impl Navigation {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Route path without its query string or fragment.
fn route_path(target: &str) -> &str {
    target
        .split(['?', '#'])
        .next()
        .unwrap_or(target)
}

/// The guard's transition rule.
///
/// The login view is always reachable; everything else needs a session.
pub fn decide(target: &str, state: AuthState, login_path: &str) -> Navigation {
    if route_path(target) == login_path {
        return Navigation::Allow;
    }
    match state {
        AuthState::Authenticated => Navigation::Allow,
        AuthState::Unauthenticated => Navigation::Redirect(login_path.to_owned()),
    }
}

/// Login gate evaluated on every route change.
pub struct NavigationGuard {
    session: Arc<dyn SessionStore>,
    login_path: String,
}

impl NavigationGuard {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self {
            session,
            login_path: LOGIN_PATH.to_owned(),
        }
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn auth_state(&self) -> AuthState {
        if self.session.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// Decide where a navigation to `target` ends up.
    pub fn check(&self, target: &str) -> Navigation {
        let state = self.auth_state();
        let decision = decide(target, state, &self.login_path);
        debug!(path = target, ?state, ?decision, "navigation guard");
        decision
    }
}
