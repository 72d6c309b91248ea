//! Authentication endpoints.
//!
//! Endpoints:
//! - POST /auth/register - Create an account and sign in
//! - POST /auth/login - Sign in with email and password
//! - POST /auth/logout - Revoke the current session
//! - GET  /auth/session - Current session projection

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sos_id::RequestId;

use crate::auth::provider;
use crate::auth::tokens::SESSION_LIFETIME_DAYS;
use crate::domain::Role;
use crate::state::AppState;

use super::authz;
use super::error::ApiError;
use super::session::{client_meta, current_session, session_token, SessionMeta, SessionUser, SESSION_COOKIE};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    name: String,
    email: String,
    password: String,
    role: String,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    user: SessionUser,
    session: SessionMeta,
    /// Dashboard section to land on after sign-up.
    redirect_to: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    user: SessionUser,
    session: SessionMeta,
}

#[derive(Debug, Serialize)]
struct LogoutResponse {
    ok: bool,
}

// =============================================================================
// Handlers
// =============================================================================

fn set_session_cookie(token: &str) -> (header::HeaderName, String) {
    let max_age = SESSION_LIFETIME_DAYS * 24 * 60 * 60;
    (
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"),
    )
}

fn clear_session_cookie() -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    )
}

/// Create an account with email and password, then sign in.
///
/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let email = req.email.trim().to_string();
    if email.is_empty() || !email.contains('@') || email.len() > 255 {
        return Err(ApiError::bad_request("invalid_email", "A valid email is required")
            .with_request_id(request_id));
    }

    if req.password.len() < 8 {
        return Err(ApiError::bad_request(
            "invalid_password",
            "Password must be at least 8 characters",
        )
        .with_request_id(request_id));
    }

    // Admin is operator-assigned only; sign-up picks between the two
    // self-service roles.
    let role = match Role::parse(&req.role) {
        Some(role @ (Role::Citizen | Role::Volunteer)) => role,
        _ => {
            return Err(ApiError::bad_request("invalid_role", "Invalid role selected")
                .with_request_id(request_id));
        }
    };

    let name = {
        let trimmed = req.name.trim();
        if trimmed.is_empty() {
            email.split('@').next().unwrap_or("User").to_string()
        } else {
            trimmed.to_string()
        }
    };

    let issued = provider::register(
        state.db(),
        &email,
        &name,
        &req.password,
        role,
        client_meta(&headers),
        &request_id,
    )
    .await?;

    let redirect_to = format!("/dashboard/{role}");
    let cookie = set_session_cookie(&issued.token);

    Ok((
        StatusCode::CREATED,
        [cookie],
        Json(RegisterResponse {
            user: issued.user,
            session: issued.session,
            redirect_to,
        }),
    ))
}

/// Sign in with email and password.
///
/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let email = req.email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("invalid_email", "Email is required")
            .with_request_id(request_id));
    }

    let issued = provider::login(
        state.db(),
        email,
        &req.password,
        client_meta(&headers),
        &request_id,
    )
    .await?;

    let cookie = set_session_cookie(&issued.token);

    Ok((
        StatusCode::OK,
        [cookie],
        Json(SessionResponse {
            user: issued.user,
            session: issued.session,
        }),
    ))
}

/// Revoke the current session and clear the cookie.
///
/// POST /auth/logout
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let token = session_token(&headers);
    let revoked = provider::logout(state.db(), token.as_deref(), &request_id).await?;

    Ok((
        StatusCode::OK,
        [clear_session_cookie()],
        Json(LogoutResponse { ok: revoked }),
    ))
}

/// Current session projection, or 401 when unauthenticated.
///
/// GET /auth/session
async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let Some(resolved) = current_session(&state, &headers, &request_id).await? else {
        return Err(ApiError::from(authz::AuthError::Unauthorized).with_request_id(request_id));
    };

    Ok(Json(SessionResponse {
        user: resolved.user,
        session: resolved.session,
    }))
}
