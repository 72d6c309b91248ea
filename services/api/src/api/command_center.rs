//! Command center endpoints for volunteer/admin triage.
//!
//! Every handler re-runs the role guard even though the route gate already
//! screened the `/command-center` prefix. The gate is edge policy; the guard
//! is the enforcement the lifecycle transitions actually depend on.
//!
//! Endpoints:
//! - GET  /command-center/reports - All reports with reporter info
//! - GET  /command-center/inventory - All relief supplies
//! - POST /command-center/reports/{id}/take-charge - pending → in_progress
//! - POST /command-center/reports/{id}/resolve - in_progress → resolved

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sos_id::{ReportId, RequestId, UserId};

use crate::db::ReportWithReporterRow;
use crate::domain::{ReportStatus, Role};
use crate::state::AppState;

use super::authz;
use super::error::ApiError;
use super::inventory::ItemResponse;
use super::session::current_session;
use super::sos::ReportResponse;

/// Roles allowed to operate the command center.
const ALLOWED_ROLES: [Role; 2] = [Role::Volunteer, Role::Admin];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/inventory", get(list_inventory))
        .route("/reports/{report_id}/take-charge", post(take_charge))
        .route("/reports/{report_id}/resolve", post(mark_resolved))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Report with the reporter's name and email.
#[derive(Debug, Serialize)]
struct TriageReportResponse {
    id: ReportId,
    user_id: UserId,
    r#type: String,
    status: String,
    location: String,
    description: String,
    created_at: DateTime<Utc>,
    user_name: Option<String>,
    user_email: Option<String>,
}

impl From<ReportWithReporterRow> for TriageReportResponse {
    fn from(row: ReportWithReporterRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            r#type: row.report_type,
            status: row.status,
            location: row.location,
            description: row.description,
            created_at: row.created_at,
            user_name: row.user_name,
            user_email: row.user_email,
        }
    }
}

#[derive(Debug, Serialize)]
struct ListTriageReportsResponse {
    items: Vec<TriageReportResponse>,
    total: i64,
}

#[derive(Debug, Serialize)]
struct ListInventoryResponse {
    items: Vec<ItemResponse>,
    total: i64,
}

#[derive(Debug, Serialize)]
struct TransitionResponse {
    report: ReportResponse,
    message: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// All reports with reporter info, newest first.
///
/// GET /command-center/reports
async fn list_reports(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    authz::require_any_role(resolved.as_ref(), &ALLOWED_ROLES)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let rows = state
        .db()
        .reports()
        .list_all_with_reporter()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, "Failed to list reports");
            ApiError::internal("internal_error", "Failed to list reports")
                .with_request_id(request_id.clone())
        })?;

    let items: Vec<TriageReportResponse> =
        rows.into_iter().map(TriageReportResponse::from).collect();
    let total = items.len() as i64;

    Ok(Json(ListTriageReportsResponse { items, total }))
}

/// All relief supplies.
///
/// GET /command-center/inventory
async fn list_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    authz::require_any_role(resolved.as_ref(), &ALLOWED_ROLES)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let rows = state.db().inventory().list_all().await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to list inventory");
        ApiError::internal("internal_error", "Failed to list inventory")
            .with_request_id(request_id.clone())
    })?;

    let items: Vec<ItemResponse> = rows.into_iter().map(ItemResponse::from).collect();
    let total = items.len() as i64;

    Ok(Json(ListInventoryResponse { items, total }))
}

async fn transition(
    state: &AppState,
    headers: &HeaderMap,
    report_id: ReportId,
    status: ReportStatus,
    message: &'static str,
    request_id: &str,
) -> Result<Json<TransitionResponse>, ApiError> {
    let resolved = current_session(state, headers, request_id).await?;
    let actor = authz::require_any_role(resolved.as_ref(), &ALLOWED_ROLES)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.to_string()))?;

    let updated = state
        .db()
        .reports()
        .set_status(report_id, status)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                request_id = %request_id,
                report_id = %report_id,
                "Failed to update report status"
            );
            ApiError::internal("internal_error", "Failed to update report")
                .with_request_id(request_id.to_string())
        })?;

    let Some(report) = updated else {
        return Err(ApiError::not_found("report_not_found", "Report not found")
            .with_request_id(request_id.to_string()));
    };

    tracing::info!(
        report_id = %report.id,
        status = %report.status,
        actor_id = %actor.id,
        request_id = %request_id,
        "Report status updated"
    );

    Ok(Json(TransitionResponse {
        report: ReportResponse::from(report),
        message,
    }))
}

/// Take charge of a pending report.
///
/// POST /command-center/reports/{report_id}/take-charge
async fn take_charge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(report_id): Path<ReportId>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();
    transition(
        &state,
        &headers,
        report_id,
        ReportStatus::InProgress,
        "Report taken in charge",
        &request_id,
    )
    .await
}

/// Mark a report as resolved.
///
/// POST /command-center/reports/{report_id}/resolve
async fn mark_resolved(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(report_id): Path<ReportId>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();
    transition(
        &state,
        &headers,
        report_id,
        ReportStatus::Resolved,
        "Report marked as resolved",
        &request_id,
    )
    .await
}
