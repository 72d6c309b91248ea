//! Role-scoped dashboard endpoints.
//!
//! The route gate already keeps callers inside their own section; each
//! handler still asserts the exact role it serves.
//!
//! Endpoints:
//! - GET   /dashboard - Redirect to the caller's section
//! - GET   /dashboard/citizen - The caller's reports
//! - GET   /dashboard/volunteer - Open reports needing attention
//! - GET   /dashboard/admin - Platform statistics
//! - PATCH /dashboard/admin/users/{user_id}/role - Update a user's role

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect},
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sos_id::{RequestId, UserId};

use crate::db::{ReportStats, UserRow};
use crate::domain::Role;
use crate::state::AppState;

use super::authz;
use super::error::ApiError;
use super::session::current_session;
use super::sos::ReportResponse;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_root))
        .route("/citizen", get(citizen_dashboard))
        .route("/volunteer", get(volunteer_dashboard))
        .route("/admin", get(admin_dashboard))
        .route("/admin/users/{user_id}/role", patch(update_user_role))
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ReportsDashboardResponse {
    items: Vec<ReportResponse>,
    total: i64,
}

#[derive(Debug, Serialize)]
struct CountEntry {
    key: String,
    count: i64,
}

#[derive(Debug, Serialize)]
struct AdminDashboardResponse {
    reports_by_status: Vec<CountEntry>,
    reports_by_type: Vec<CountEntry>,
    total_reports: i64,
    total_users: i64,
}

#[derive(Debug, Deserialize)]
struct UpdateRoleRequest {
    role: String,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    id: UserId,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Send the caller to their own dashboard section.
///
/// GET /dashboard
///
/// The route gate normally answers this before the handler runs; keeping the
/// handler gives the route a defined meaning even without the gate in front.
async fn dashboard_root(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    let user = authz::require_auth(resolved.as_ref())
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    Ok(Redirect::temporary(&format!("/dashboard/{}", user.role)))
}

/// The caller's reports, newest first.
///
/// GET /dashboard/citizen
async fn citizen_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    let user = authz::require_role(resolved.as_ref(), Role::Citizen)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let user_id = user.id.parse::<UserId>().map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Session user id is not a serial id");
        ApiError::internal("internal_error", "Failed to load dashboard")
            .with_request_id(request_id.clone())
    })?;

    let rows = state.db().reports().list_by_user(user_id).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to load citizen dashboard");
        ApiError::internal("internal_error", "Failed to load dashboard")
            .with_request_id(request_id.clone())
    })?;

    let items: Vec<ReportResponse> = rows.into_iter().map(ReportResponse::from).collect();
    let total = items.len() as i64;

    Ok(Json(ReportsDashboardResponse { items, total }))
}

/// Open reports (pending and in progress), longest-waiting first.
///
/// GET /dashboard/volunteer
async fn volunteer_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    authz::require_role(resolved.as_ref(), Role::Volunteer)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let rows = state.db().reports().list_open().await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to load volunteer dashboard");
        ApiError::internal("internal_error", "Failed to load dashboard")
            .with_request_id(request_id.clone())
    })?;

    let items: Vec<ReportResponse> = rows.into_iter().map(ReportResponse::from).collect();
    let total = items.len() as i64;

    Ok(Json(ReportsDashboardResponse { items, total }))
}

/// Platform statistics.
///
/// GET /dashboard/admin
async fn admin_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    authz::require_role(resolved.as_ref(), Role::Admin)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let stats: ReportStats = state.db().reports().stats().await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to load report stats");
        ApiError::internal("internal_error", "Failed to load dashboard")
            .with_request_id(request_id.clone())
    })?;

    let total_users = state.db().users().count().await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to count users");
        ApiError::internal("internal_error", "Failed to load dashboard")
            .with_request_id(request_id.clone())
    })?;

    Ok(Json(AdminDashboardResponse {
        reports_by_status: stats
            .by_status
            .into_iter()
            .map(|entry| CountEntry {
                key: entry.status,
                count: entry.count,
            })
            .collect(),
        reports_by_type: stats
            .by_type
            .into_iter()
            .map(|entry| CountEntry {
                key: entry.report_type,
                count: entry.count,
            })
            .collect(),
        total_reports: stats.total,
        total_users,
    }))
}

/// Update a user's role. The one role mutation on the platform.
///
/// PATCH /dashboard/admin/users/{user_id}/role
async fn update_user_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<UserId>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    let actor = authz::require_role(resolved.as_ref(), Role::Admin)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let Some(role) = Role::parse(&req.role) else {
        return Err(ApiError::bad_request(
            "invalid_role",
            format!("unknown role '{}'", req.role),
        )
        .with_request_id(request_id));
    };

    let updated = state.db().users().update_role(user_id, role).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, user_id = %user_id, "Failed to update role");
        ApiError::internal("internal_error", "Failed to update role")
            .with_request_id(request_id.clone())
    })?;

    let Some(user) = updated else {
        return Err(ApiError::not_found("user_not_found", "User not found")
            .with_request_id(request_id));
    };

    tracing::info!(
        user_id = %user.id,
        role = %role,
        actor_id = %actor.id,
        request_id = %request_id,
        "User role updated"
    );

    Ok(Json(UserResponse::from(user)))
}
