//! Session resolution from request headers.
//!
//! The resolver turns transport headers into the canonical session projection
//! the rest of the authorization core operates on. It is a pure read: calling
//! it any number of times for the same request mutates nothing.

use axum::http::HeaderMap;
use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::auth::provider::ClientMeta;
use crate::auth::tokens::{hash_token, SESSION_TOKEN_PREFIX};
use crate::db::DbError;
use crate::domain::Role;
use crate::state::AppState;

use super::error::ApiError;

/// Name of the session cookie set at login.
pub const SESSION_COOKIE: &str = "sos_session";

pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Canonical user projection the guards and the route gate operate on.
///
/// `id` is the stored serial id canonicalized to a string; `role` is parsed
/// with the fail-safe `citizen` default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Session metadata exposed alongside the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionMeta {
    pub id: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful session resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    pub user: SessionUser,
    pub session: SessionMeta,
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Reads a cookie value from the Cookie header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = header_string(headers, "cookie")?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Extracts the session token from the request, if any.
///
/// `Authorization: Bearer sos_st_…` wins over the cookie. A malformed header
/// or a token without the session prefix reads as "no token"; transport
/// noise is not an authentication error.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_value) = header_string(headers, AUTHORIZATION_HEADER) {
        if let Some(token) = auth_value.trim().strip_prefix("Bearer ") {
            let token = token.trim();
            if token.starts_with(SESSION_TOKEN_PREFIX) {
                return Some(token.to_string());
            }
        }
    }

    cookie_value(headers, SESSION_COOKIE)
        .filter(|token| token.starts_with(SESSION_TOKEN_PREFIX))
}

/// Client transport metadata for session records (informational only).
pub fn client_meta(headers: &HeaderMap) -> ClientMeta {
    let ip_address = header_string(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty());
    let user_agent = header_string(headers, "user-agent");

    ClientMeta {
        ip_address,
        user_agent,
    }
}

/// Resolves the active session for a request.
///
/// One store lookup per call. Absent or malformed credentials resolve to
/// `Ok(None)`; a store failure propagates as `Err` so callers can tell
/// "unauthenticated" apart from "auth backend unavailable".
pub async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<SessionResult>, DbError> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };

    let row = state
        .db()
        .sessions()
        .find_active_by_token_hash(&hash_token(&token))
        .await?;

    Ok(row.map(|row| SessionResult {
        user: SessionUser {
            id: row.user_id.to_string(),
            email: row.email,
            role: Role::parse_or_default(&row.role),
        },
        session: SessionMeta {
            id: row.session_id,
            expires_at: row.expires_at,
        },
    }))
}

/// Handler-facing wrapper: resolves the session and maps a store failure to a
/// 500 problem response, logged with the request id.
pub async fn current_session(
    state: &AppState,
    headers: &HeaderMap,
    request_id: &str,
) -> Result<Option<SessionResult>, ApiError> {
    resolve_session(state, headers).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to resolve session");
        ApiError::internal("internal_error", "Failed to resolve session")
            .with_request_id(request_id.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        let headers = headers_with("authorization", "Bearer sos_st_abc123");
        assert_eq!(session_token(&headers), Some("sos_st_abc123".to_string()));
    }

    #[test]
    fn cookie_token_is_extracted() {
        let headers = headers_with("cookie", "theme=dark; sos_session=sos_st_xyz; lang=fr");
        assert_eq!(session_token(&headers), Some("sos_st_xyz".to_string()));
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = headers_with("authorization", "Bearer sos_st_from_header");
        headers.insert(
            "cookie",
            HeaderValue::from_static("sos_session=sos_st_from_cookie"),
        );
        assert_eq!(
            session_token(&headers),
            Some("sos_st_from_header".to_string())
        );
    }

    #[test]
    fn malformed_credentials_read_as_no_token() {
        assert_eq!(session_token(&HeaderMap::new()), None);
        assert_eq!(
            session_token(&headers_with("authorization", "Basic dXNlcjpwdw==")),
            None
        );
        assert_eq!(
            session_token(&headers_with("authorization", "Bearer not-a-session-token")),
            None
        );
        assert_eq!(
            session_token(&headers_with("cookie", "sos_session=garbage")),
            None
        );
    }

    #[test]
    fn client_meta_takes_first_forwarded_ip() {
        let mut headers = headers_with("x-forwarded-for", "203.0.113.9, 10.0.0.1");
        headers.insert("user-agent", HeaderValue::from_static("sos-test/1.0"));
        let meta = client_meta(&headers);
        assert_eq!(meta.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(meta.user_agent.as_deref(), Some("sos-test/1.0"));
    }
}
