//! Relief supply inventory endpoints.
//!
//! Reads require any authenticated role; mutations sit behind the same
//! volunteer/admin guard as report triage.
//!
//! Endpoints:
//! - GET   /inventory - List all items
//! - POST  /inventory - Add an item
//! - PATCH /inventory/{id}/quantity - Set absolute quantity
//! - POST  /inventory/{id}/adjust - Add or remove stock

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sos_id::{ItemId, RequestId};

use crate::db::ItemRow;
use crate::domain::{ItemName, Role};
use crate::state::AppState;

use super::authz;
use super::error::ApiError;
use super::session::current_session;

/// Roles allowed to mutate inventory.
const WRITE_ROLES: [Role; 2] = [Role::Volunteer, Role::Admin];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items))
        .route("/", post(create_item))
        .route("/{item_id}/quantity", patch(set_quantity))
        .route("/{item_id}/adjust", post(adjust_quantity))
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateItemRequest {
    item_name: String,
    #[serde(default)]
    quantity: i32,
    center_location: String,
}

#[derive(Debug, Deserialize)]
struct SetQuantityRequest {
    quantity: i32,
}

#[derive(Debug, Deserialize)]
struct AdjustQuantityRequest {
    /// Positive to add stock, negative to remove.
    delta: i32,
}

/// Response for a single inventory item.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: ItemId,
    pub item_name: String,
    pub quantity: i32,
    pub center_location: String,
}

impl From<ItemRow> for ItemResponse {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            item_name: row.item_name,
            quantity: row.quantity,
            center_location: row.center_location,
        }
    }
}

#[derive(Debug, Serialize)]
struct ListItemsResponse {
    items: Vec<ItemResponse>,
    total: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all items, grouped by center.
///
/// GET /inventory
async fn list_items(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    authz::require_auth(resolved.as_ref())
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let rows = state.db().inventory().list_all().await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "Failed to list inventory");
        ApiError::internal("internal_error", "Failed to list inventory")
            .with_request_id(request_id.clone())
    })?;

    let items: Vec<ItemResponse> = rows.into_iter().map(ItemResponse::from).collect();
    let total = items.len() as i64;

    Ok(Json(ListItemsResponse { items, total }))
}

/// Add an inventory item.
///
/// POST /inventory
async fn create_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    authz::require_any_role(resolved.as_ref(), &WRITE_ROLES)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let Some(item_name) = ItemName::parse(&req.item_name) else {
        return Err(ApiError::bad_request(
            "invalid_item_name",
            format!("unknown item '{}'", req.item_name),
        )
        .with_request_id(request_id));
    };

    if req.quantity < 0 {
        return Err(
            ApiError::bad_request("invalid_quantity", "Quantity cannot be negative")
                .with_request_id(request_id),
        );
    }

    if req.center_location.is_empty() {
        return Err(ApiError::bad_request(
            "invalid_center_location",
            "Center location is required",
        )
        .with_request_id(request_id));
    }

    let item = state
        .db()
        .inventory()
        .insert(item_name, req.quantity, &req.center_location)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, "Failed to create inventory item");
            ApiError::internal("internal_error", "Failed to create inventory item")
                .with_request_id(request_id.clone())
        })?;

    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// Set an item's absolute quantity.
///
/// PATCH /inventory/{item_id}/quantity
async fn set_quantity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<ItemId>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    authz::require_any_role(resolved.as_ref(), &WRITE_ROLES)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    if req.quantity < 0 {
        return Err(
            ApiError::bad_request("invalid_quantity", "Quantity cannot be negative")
                .with_request_id(request_id),
        );
    }

    let updated = state
        .db()
        .inventory()
        .set_quantity(item_id, req.quantity)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, item_id = %item_id, "Failed to set quantity");
            ApiError::internal("internal_error", "Failed to update inventory item")
                .with_request_id(request_id.clone())
        })?;

    let Some(item) = updated else {
        return Err(
            ApiError::not_found("item_not_found", "Inventory item not found")
                .with_request_id(request_id),
        );
    };

    Ok(Json(ItemResponse::from(item)))
}

/// Add or remove stock.
///
/// POST /inventory/{item_id}/adjust
///
/// The read-then-write is not atomic; concurrent adjustments are
/// last-write-wins like every other store update here.
async fn adjust_quantity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<ItemId>,
    Json(req): Json<AdjustQuantityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new().to_string();

    let resolved = current_session(&state, &headers, &request_id).await?;
    authz::require_any_role(resolved.as_ref(), &WRITE_ROLES)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.clone()))?;

    let current = state.db().inventory().find_by_id(item_id).await.map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, item_id = %item_id, "Failed to load item");
        ApiError::internal("internal_error", "Failed to update inventory item")
            .with_request_id(request_id.clone())
    })?;

    let Some(current) = current else {
        return Err(
            ApiError::not_found("item_not_found", "Inventory item not found")
                .with_request_id(request_id),
        );
    };

    let new_quantity = current.quantity.saturating_add(req.delta);
    if new_quantity < 0 {
        return Err(ApiError::bad_request(
            "invalid_quantity",
            format!(
                "Cannot remove {} from a stock of {}",
                req.delta.unsigned_abs(),
                current.quantity
            ),
        )
        .with_request_id(request_id));
    }

    let updated = state
        .db()
        .inventory()
        .set_quantity(item_id, new_quantity)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id = %request_id, item_id = %item_id, "Failed to adjust quantity");
            ApiError::internal("internal_error", "Failed to update inventory item")
                .with_request_id(request_id.clone())
        })?;

    let Some(item) = updated else {
        return Err(
            ApiError::not_found("item_not_found", "Inventory item not found")
                .with_request_id(request_id),
        );
    };

    Ok(Json(ItemResponse::from(item)))
}
