//! Credential registration, login, and logout.
//!
//! All functions return `ApiError` so handlers can propagate failures with
//! `?`. Credential failures are reported with one generic message; the
//! response never reveals whether the email exists.

use sos_id::SessionId;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::session::{SessionMeta, SessionUser};
use crate::db::{Database, NewSession, UserRow};
use crate::domain::Role;

use super::password;
use super::tokens::{generate_session_token, hash_token, session_expires_at};

/// Client transport metadata recorded on the session (informational only).
#[derive(Debug, Default, Clone)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A freshly issued session: the raw token plus the canonical projection.
#[derive(Debug)]
pub struct IssuedSession {
    pub token: String,
    pub user: SessionUser,
    pub session: SessionMeta,
}

/// Registers a new credential user and signs them in.
///
/// Input validation (email shape, password length, allowed roles) happens at
/// the HTTP layer; this function owns uniqueness and persistence.
pub async fn register(
    db: &Database,
    email: &str,
    name: &str,
    password: &str,
    role: Role,
    client: ClientMeta,
    request_id: &str,
) -> Result<IssuedSession, ApiError> {
    let users = db.users();

    let existing = users.find_by_email(email).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to check existing email");
        ApiError::internal("internal_error", "Failed to register")
            .with_request_id(request_id.to_string())
    })?;

    if existing.is_some() {
        return Err(ApiError::conflict(
            "email_exists",
            "An account with this email already exists",
        )
        .with_request_id(request_id.to_string()));
    }

    let user = users.create(email, name, role).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to create user");
        ApiError::internal("internal_error", "Failed to register")
            .with_request_id(request_id.to_string())
    })?;

    let password_hash = password::hash_password(password).map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to hash password");
        ApiError::internal("internal_error", "Failed to register")
            .with_request_id(request_id.to_string())
    })?;

    db.accounts()
        .create_credential(user.id, &password_hash)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, "Failed to create credential account");
            ApiError::internal("internal_error", "Failed to register")
                .with_request_id(request_id.to_string())
        })?;

    info!(user_id = %user.id, role = %role, "Registered new user");

    issue_session(db, &user, client, request_id).await
}

/// Verifies email/password credentials and issues a session.
pub async fn login(
    db: &Database,
    email: &str,
    password: &str,
    client: ClientMeta,
    request_id: &str,
) -> Result<IssuedSession, ApiError> {
    let invalid_credentials = || {
        ApiError::unauthorized("invalid_credentials", "Invalid email or password")
            .with_request_id(request_id.to_string())
    };

    let user = db.users().find_by_email(email).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to look up user");
        ApiError::internal("internal_error", "Failed to sign in")
            .with_request_id(request_id.to_string())
    })?;

    let Some(user) = user else {
        return Err(invalid_credentials());
    };

    let account = db
        .accounts()
        .find_credential_by_user(user.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, "Failed to look up credential account");
            ApiError::internal("internal_error", "Failed to sign in")
                .with_request_id(request_id.to_string())
        })?;

    // OAuth-only users have no credential account; same generic rejection.
    let Some(stored_hash) = account.and_then(|a| a.password_hash) else {
        return Err(invalid_credentials());
    };

    let verified = password::verify_password(password, &stored_hash).map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Stored password hash is unreadable");
        ApiError::internal("internal_error", "Failed to sign in")
            .with_request_id(request_id.to_string())
    })?;

    if !verified {
        return Err(invalid_credentials());
    }

    issue_session(db, &user, client, request_id).await
}

/// Revokes the session behind the given token.
///
/// Logout is idempotent: an unknown or already-revoked token reports
/// `Ok(false)` rather than failing.
pub async fn logout(
    db: &Database,
    token: Option<&str>,
    request_id: &str,
) -> Result<bool, ApiError> {
    let Some(token) = token else {
        return Ok(false);
    };

    db.sessions()
        .revoke_by_token_hash(&hash_token(token))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, "Failed to revoke session");
            ApiError::internal("internal_error", "Failed to sign out")
                .with_request_id(request_id.to_string())
        })
}

async fn issue_session(
    db: &Database,
    user: &UserRow,
    client: ClientMeta,
    request_id: &str,
) -> Result<IssuedSession, ApiError> {
    let token = generate_session_token();
    let session_id = SessionId::new();
    let expires_at = session_expires_at();

    db.sessions()
        .create(NewSession {
            session_id,
            user_id: user.id,
            token_hash: &hash_token(&token),
            expires_at,
            ip_address: client.ip_address.as_deref(),
            user_agent: client.user_agent.as_deref(),
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, "Failed to persist session");
            ApiError::internal("internal_error", "Failed to create session")
                .with_request_id(request_id.to_string())
        })?;

    Ok(IssuedSession {
        token,
        user: SessionUser {
            id: user.id.to_string(),
            email: user.email.clone(),
            role: user.role(),
        },
        session: SessionMeta {
            id: session_id.to_string(),
            expires_at,
        },
    })
}
