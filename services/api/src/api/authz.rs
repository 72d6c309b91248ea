//! Authorization guards.
//!
//! Every privileged handler calls one of these against the session it
//! resolved, even when the route gate already screened the path: a
//! misconfigured prefix table must never be the only thing between a citizen
//! and a privileged mutation.
//!
//! Role checks are exact set membership. There is no hierarchy: `admin` does
//! not satisfy a volunteer-only check.

use thiserror::Error;

use crate::domain::Role;

use super::error::ApiError;
use super::session::{SessionResult, SessionUser};

/// Guard failures.
///
/// `Unauthorized` (no valid session) and `Forbidden` (valid session, wrong
/// role) are distinct so callers can map them to re-authentication vs.
/// access-denied without inspecting message strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("{message}")]
    Forbidden { message: String },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::Unauthorized => ApiError::unauthorized("unauthorized", err.to_string()),
            AuthError::Forbidden { .. } => ApiError::forbidden("forbidden", err.to_string()),
        }
    }
}

/// Requires a valid session. The single choke point every privileged
/// operation passes through.
pub fn require_auth(session: Option<&SessionResult>) -> Result<&SessionUser, AuthError> {
    session
        .map(|resolved| &resolved.user)
        .ok_or(AuthError::Unauthorized)
}

/// Requires the exact role.
pub fn require_role(
    session: Option<&SessionResult>,
    role: Role,
) -> Result<&SessionUser, AuthError> {
    let user = require_auth(session)?;

    if user.role != role {
        return Err(AuthError::Forbidden {
            message: format!("Role '{role}' required"),
        });
    }

    Ok(user)
}

/// Requires membership in the given role set.
pub fn require_any_role<'a>(
    session: Option<&'a SessionResult>,
    roles: &[Role],
) -> Result<&'a SessionUser, AuthError> {
    let user = require_auth(session)?;

    if !roles.contains(&user.role) {
        let accepted = roles
            .iter()
            .map(|r| format!("'{r}'"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AuthError::Forbidden {
            message: format!("One of roles {accepted} required"),
        });
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::session::SessionMeta;
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

    #[test]
    fn require_auth_without_session_is_unauthorized() {
        assert_eq!(require_auth(None).unwrap_err(), AuthError::Unauthorized);
    }

    #[test]
    fn require_auth_returns_the_user() {
        let session = session_with_role(Role::Citizen);
        let user = require_auth(Some(&session)).unwrap();
        assert_eq!(user.id, "1");
    }

    #[rstest]
    #[case(Role::Citizen)]
    #[case(Role::Volunteer)]
    fn require_role_admin_rejects_other_roles(#[case] role: Role) {
        let session = session_with_role(role);
        let err = require_role(Some(&session), Role::Admin).unwrap_err();
        match err {
            AuthError::Forbidden { message } => assert!(message.contains("admin")),
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn require_role_accepts_exact_match() {
        let session = session_with_role(Role::Admin);
        assert!(require_role(Some(&session), Role::Admin).is_ok());
    }

    #[test]
    fn require_role_has_no_hierarchy() {
        // Admin does not satisfy a volunteer-only check.
        let session = session_with_role(Role::Admin);
        assert!(require_role(Some(&session), Role::Volunteer).is_err());
    }

    #[test]
    fn require_role_without_session_fails_before_role_comparison() {
        assert_eq!(
            require_role(None, Role::Admin).unwrap_err(),
            AuthError::Unauthorized
        );
    }

    #[rstest]
    #[case(Role::Citizen, false)]
    #[case(Role::Volunteer, true)]
    #[case(Role::Admin, true)]
    fn require_any_role_checks_set_membership(#[case] role: Role, #[case] allowed: bool) {
        let session = session_with_role(role);
        let result = require_any_role(Some(&session), &[Role::Volunteer, Role::Admin]);
        assert_eq!(result.is_ok(), allowed);
    }

    #[test]
    fn require_any_role_names_the_accepted_set() {
        let session = session_with_role(Role::Citizen);
        let err = require_any_role(Some(&session), &[Role::Volunteer, Role::Admin]).unwrap_err();
        match err {
            AuthError::Forbidden { message } => {
                assert!(message.contains("volunteer"));
                assert!(message.contains("admin"));
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }
}
