//! Route gate: path-prefix policy applied before any handler runs.
//!
//! The gate classifies the request path against static prefix tables, resolves
//! the session once, and emits a pass/redirect decision. It deliberately does
//! not call the authorization guards: edge policy and action-level
//! enforcement stay two independent layers, so a hole in one is still covered
//! by the other.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::domain::Role;
use crate::state::AppState;

use super::error::ApiError;
use super::session::{resolve_session, SessionResult};

/// Path the gate sends unauthenticated requests to.
pub const LOGIN_PATH: &str = "/auth";

/// Path the gate sends authenticated-but-disallowed requests to.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Generic dashboard root; redirects to the caller's role-scoped subpath.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Routes that require the user to be logged in.
const AUTH_REQUIRED_PREFIXES: [&str; 4] = ["/dashboard", "/sos", "/inventory", "/command-center"];

/// Admin-only routes: citizens and volunteers are redirected to /unauthorized.
const ADMIN_ONLY_PREFIXES: [&str; 2] = ["/command-center", "/dashboard/admin"];

/// Role-scoped dashboard roots, keyed by the role that owns each section.
const ROLE_DASHBOARD_PREFIXES: [(&str, Role); 3] = [
    ("/dashboard/citizen", Role::Citizen),
    ("/dashboard/volunteer", Role::Volunteer),
    ("/dashboard/admin", Role::Admin),
];

/// The gate's verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Public route, or a privileged route the caller may enter.
    Pass,
    /// No session on a protected route.
    RedirectLogin,
    /// Valid session, role not allowed here.
    RedirectUnauthorized,
    /// Authenticated but in the wrong dashboard section; carries the path of
    /// the caller's own section (or the generic root).
    RedirectRoleHome(String),
}

impl GateDecision {
    /// Redirect target, if the decision is a redirect.
    pub fn location(&self) -> Option<&str> {
        match self {
            GateDecision::Pass => None,
            GateDecision::RedirectLogin => Some(LOGIN_PATH),
            GateDecision::RedirectUnauthorized => Some(UNAUTHORIZED_PATH),
            GateDecision::RedirectRoleHome(path) => Some(path),
        }
    }
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn is_auth_required(path: &str) -> bool {
    AUTH_REQUIRED_PREFIXES
        .iter()
        .any(|prefix| matches_prefix(path, prefix))
}

fn is_admin_only(path: &str) -> bool {
    ADMIN_ONLY_PREFIXES
        .iter()
        .any(|prefix| matches_prefix(path, prefix))
}

/// Pure gate decision for one request path and resolved session.
pub fn decide(path: &str, session: Option<&SessionResult>) -> GateDecision {
    if !is_auth_required(path) {
        return GateDecision::Pass;
    }

    let Some(session) = session else {
        return GateDecision::RedirectLogin;
    };

    let role = session.user.role;

    if is_admin_only(path) && role != Role::Admin {
        return GateDecision::RedirectUnauthorized;
    }

    // Bare dashboard root: send the caller to their own section.
    if path == DASHBOARD_PATH {
        return GateDecision::RedirectRoleHome(format!("{DASHBOARD_PATH}/{role}"));
    }

    // Wrong role-scoped section: back to the generic root, which re-routes.
    // Softer than /unauthorized: the caller is authenticated, just lost.
    for (prefix, owner) in ROLE_DASHBOARD_PREFIXES {
        if matches_prefix(path, prefix) && role != owner {
            return GateDecision::RedirectRoleHome(DASHBOARD_PATH.to_string());
        }
    }

    GateDecision::Pass
}

/// Axum middleware applying the gate to every request.
///
/// Public paths skip session resolution entirely. A resolver infrastructure
/// failure surfaces as 500; it must not masquerade as a login redirect.
pub async fn layer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    if !is_auth_required(&path) {
        return next.run(request).await;
    }

    let session = match resolve_session(&state, request.headers()).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, path = %path, "Route gate failed to resolve session");
            return ApiError::internal("internal_error", "Failed to resolve session")
                .into_response();
        }
    };

    match decide(&path, session.as_ref()) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::RedirectLogin => Redirect::temporary(LOGIN_PATH).into_response(),
        GateDecision::RedirectUnauthorized => {
            Redirect::temporary(UNAUTHORIZED_PATH).into_response()
        }
        GateDecision::RedirectRoleHome(target) => Redirect::temporary(&target).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::session::{SessionMeta, SessionUser};
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn session_with_role(role: Role) -> SessionResult {
        SessionResult {
            user: SessionUser {
                id: "1".to_string(),
                email: "user@example.com".to_string(),
                role,
            },
            session: SessionMeta {
                id: "sess_01HV4Z2WQXKJNM8GPQY6VBKC3D".to_string(),
                expires_at: Utc::now() + Duration::days(7),
            },
        }
    }

    #[rstest]
    #[case("/")]
    #[case("/auth")]
    #[case("/auth/login")]
    #[case("/unauthorized")]
    #[case("/healthz")]
    #[case("/sos-info")] // prefix match must not swallow sibling paths
    fn public_paths_pass_without_a_session(#[case] path: &str) {
        assert_eq!(decide(path, None), GateDecision::Pass);
    }

    #[rstest]
    #[case("/dashboard")]
    #[case("/sos")]
    #[case("/inventory")]
    #[case("/command-center")]
    #[case("/command-center/reports")]
    fn protected_paths_require_login(#[case] path: &str) {
        assert_eq!(decide(path, None), GateDecision::RedirectLogin);
    }

    #[rstest]
    #[case(Role::Citizen)]
    #[case(Role::Volunteer)]
    fn non_admins_are_blocked_from_command_center(#[case] role: Role) {
        let session = session_with_role(role);
        assert_eq!(
            decide("/command-center", Some(&session)),
            GateDecision::RedirectUnauthorized
        );
    }

    #[test]
    fn admin_passes_command_center() {
        let session = session_with_role(Role::Admin);
        assert_eq!(decide("/command-center", Some(&session)), GateDecision::Pass);
        assert_eq!(
            decide("/command-center/reports", Some(&session)),
            GateDecision::Pass
        );
    }

    #[test]
    fn volunteer_is_blocked_from_admin_dashboard() {
        let session = session_with_role(Role::Volunteer);
        assert_eq!(
            decide("/dashboard/admin", Some(&session)),
            GateDecision::RedirectUnauthorized
        );
    }

    #[rstest]
    #[case(Role::Citizen, "/dashboard/citizen")]
    #[case(Role::Volunteer, "/dashboard/volunteer")]
    #[case(Role::Admin, "/dashboard/admin")]
    fn dashboard_root_redirects_to_own_section(#[case] role: Role, #[case] expected: &str) {
        let session = session_with_role(role);
        assert_eq!(
            decide("/dashboard", Some(&session)),
            GateDecision::RedirectRoleHome(expected.to_string())
        );
    }

    #[test]
    fn wrong_section_redirects_to_dashboard_root() {
        let citizen = session_with_role(Role::Citizen);
        assert_eq!(
            decide("/dashboard/volunteer", Some(&citizen)),
            GateDecision::RedirectRoleHome("/dashboard".to_string())
        );

        let volunteer = session_with_role(Role::Volunteer);
        assert_eq!(
            decide("/dashboard/citizen", Some(&volunteer)),
            GateDecision::RedirectRoleHome("/dashboard".to_string())
        );
    }

    #[test]
    fn own_section_passes() {
        let citizen = session_with_role(Role::Citizen);
        assert_eq!(decide("/dashboard/citizen", Some(&citizen)), GateDecision::Pass);

        let volunteer = session_with_role(Role::Volunteer);
        assert_eq!(
            decide("/dashboard/volunteer/reports", Some(&volunteer)),
            GateDecision::Pass
        );
    }

    #[test]
    fn locations_match_decisions() {
        assert_eq!(GateDecision::Pass.location(), None);
        assert_eq!(GateDecision::RedirectLogin.location(), Some("/auth"));
        assert_eq!(
            GateDecision::RedirectUnauthorized.location(),
            Some("/unauthorized")
        );
    }
}
