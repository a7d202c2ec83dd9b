//! Access guard for protected surfaces.
//!
//! Runs before a protected route or command executes: loads any stored
//! session, refreshes an expired access token, and otherwise yields a
//! single redirect to the sign-in page with the attempted destination
//! recorded for the return trip.

use super::{AuthAction, AuthCheck, SessionManager};
use crate::api::ApiError;

/// A navigable destination and whether it requires authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub requires_auth: bool,
}

impl Route {
    pub fn protected(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: true,
        }
    }

    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
        }
    }
}

/// Guard verdict: continue to the route, or go sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

/// Decides whether navigation to `route` may proceed.
///
/// Public routes always proceed. Protected routes proceed only with a
/// usable session; an expired access token is refreshed first. Exactly one
/// redirect is produced otherwise, and the attempted destination is
/// recorded so sign-in can return to it.
///
/// # Errors
/// Returns an error only for local store I/O failures.
pub async fn before_each(
    route: &Route,
    manager: &SessionManager,
) -> Result<GuardDecision, ApiError> {
    if !route.requires_auth {
        return Ok(GuardDecision::Proceed);
    }

    if !manager.is_authenticated() {
        manager.initialize().await?;
    }

    let return_to = manager.app_url(&route.path);
    if manager.session().is_none() {
        return Ok(GuardDecision::Redirect(
            manager.login_redirect_url(AuthAction::Login, Some(&return_to)),
        ));
    }

    match manager.check_auth().await? {
        AuthCheck::Authenticated => Ok(GuardDecision::Proceed),
        // Re-record the return URL so sign-in comes back to the route the
        // user actually attempted, not the application root.
        AuthCheck::Redirect(_) => Ok(GuardDecision::Redirect(
            manager.login_redirect_url(AuthAction::Login, Some(&return_to)),
        )),
    }
}
