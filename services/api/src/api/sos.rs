//! SOS report endpoints for authenticated users.
//!
//! Endpoints:
//! - POST /sos - Submit an emergency report
//! - GET  /sos - List the caller's own reports

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sos_id::{ReportId, RequestId, UserId};

use crate::db::ReportRow;
use crate::domain::NewReport;
use crate::state::AppState;

use super::authz;
use super::error::ApiError;
use super::session::{current_session, SessionUser};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_report))
        .route("/", get(my_reports))
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateReportRequest {
    r#type: String,
    location: String,
    description: String,
}

/// Response for a single report.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: ReportId,
    pub user_id: UserId,
    pub r#type: String,
    pub status: String,
    pub location: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReportRow> for ReportResponse {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            r#type: row.report_type,
            status: row.status,
            location: row.location,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct ListReportsResponse {
    items: Vec<ReportResponse>,
    total: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// The reporter is always the authenticated caller; a serial id that fails to
/// parse back out of the canonical string projection would mean a corrupted
/// session row.
fn reporter_id(user: &SessionUser, request_id: &str) -> Result<UserId, ApiError> {
    user.id.parse::<UserId>().map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Session user id is not a serial id");
        ApiError::internal("internal_error", "Failed to identify reporter")
            .with_request_id(request_id.to_string())
    })
}

/// Submit an emergency report.
///
/// POST /sos
async fn create_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    let user = authz::require_auth(resolved.as_ref())
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let user_id = reporter_id(user, &request_id)?;

    let new_report = NewReport::parse(user_id, &req.r#type, req.location, req.description)
        .map_err(|e| ApiError::from_validation(e).with_request_id(request_id.clone()))?;

    // The reporter must reference an existing user at creation time.
    let reporter = state.db().users().find_by_id(user_id).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to look up reporter");
        ApiError::internal("internal_error", "Failed to create report")
            .with_request_id(request_id.clone())
    })?;

    if reporter.is_none() {
        return Err(
            ApiError::not_found("reporter_not_found", "Reporter user not found")
                .with_request_id(request_id),
        );
    }

    let report = state.db().reports().insert(&new_report).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to create report");
        ApiError::internal("internal_error", "Failed to create report")
            .with_request_id(request_id.clone())
    })?;

    tracing::info!(
        report_id = %report.id,
        report_type = %report.report_type,
        request_id = %request_id,
        "Report created"
    );

    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

/// List the caller's own reports, newest first.
///
/// GET /sos
async fn my_reports(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    let user = authz::require_auth(resolved.as_ref())
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let user_id = reporter_id(user, &request_id)?;

    let rows = state.db().reports().list_by_user(user_id).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to list reports");
        ApiError::internal("internal_error", "Failed to list reports")
            .with_request_id(request_id.clone())
    })?;

    let items: Vec<ReportResponse> = rows.into_iter().map(ReportResponse::from).collect();
    let total = items.len() as i64;

    Ok(Json(ListReportsResponse { items, total }))
}
