/// Shipment endpoints
///
/// All endpoints require a session token. Any authenticated user may read,
/// update or delete any shipment; `/shipment/my` narrows the listing to the
/// caller's own.
///
/// # Endpoints
///
/// - `GET /shipment` - List all shipments
/// - `POST /shipment` - Create shipment
/// - `GET /shipment/my` - List the caller's shipments
/// - `GET /shipment/:id` - Fetch one shipment
/// - `PATCH /shipment/:id` - Partial update
/// - `DELETE /shipment/:id` - Delete shipment
///
/// Request bodies may carry `cost`, `createdBy` or `id`; they are ignored.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use shipsy_shared::{
    auth::service::UserIdentity,
    models::shipment::{NewShipment, Shipment, ShipmentPatch},
};
use uuid::Uuid;

/// Shipment list response
#[derive(Debug, Serialize, Deserialize)]
pub struct ShipmentList {
    /// Shipments, newest first
    pub data: Vec<Shipment>,

    /// Number of shipments in `data`
    pub total: usize,
}

impl From<Vec<Shipment>> for ShipmentList {
    fn from(data: Vec<Shipment>) -> Self {
        Self {
            total: data.len(),
            data,
        }
    }
}

/// Delete confirmation
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// IDs that are not UUIDs cannot name a shipment
fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Shipment not found".to_string()))
}

/// Lists every shipment
///
/// # Response
///
/// ```json
/// { "data": [ ... ], "total": 3 }
/// ```
pub async fn list_shipments(State(state): State<AppState>) -> ApiResult<Json<ShipmentList>> {
    let shipments = state.shipments.list_all().await?;
    Ok(Json(shipments.into()))
}

/// Lists shipments created by the caller
pub async fn list_my_shipments(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<ShipmentList>> {
    let shipments = state.shipments.list_mine(&identity).await?;
    Ok(Json(shipments.into()))
}

/// Creates a shipment owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /shipment
/// Content-Type: application/json
///
/// {
///   "title": "Box",
///   "weightKg": 10,
///   "distanceKm": 20,
///   "baseRate": 5
/// }
/// ```
///
/// # Response (201)
///
/// The stored shipment, with `cost` = 60.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Missing or negative numeric field
pub async fn create_shipment(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    payload: Result<Json<NewShipment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Shipment>)> {
    let Json(input) = payload?;
    let shipment = state.shipments.create(&identity, input).await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// Fetches one shipment
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Shipment>> {
    let id = parse_id(&id)?;
    let shipment = state.shipments.get_by_id(id).await?;
    Ok(Json(shipment))
}

/// Applies a partial update
///
/// Only fields present in the body change; `cost` is recomputed and
/// `updatedAt` refreshed.
pub async fn update_shipment(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<String>,
    payload: Result<Json<ShipmentPatch>, JsonRejection>,
) -> ApiResult<Json<Shipment>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    let shipment = state.shipments.update(id, &identity, patch).await?;
    Ok(Json(shipment))
}

/// Deletes a shipment
///
/// # Response
///
/// ```json
/// { "message": "Shipment deleted" }
/// ```
pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_id(&id)?;
    state.shipments.delete(id).await?;

    Ok(Json(DeleteResponse {
        message: "Shipment deleted".to_string(),
    }))
}
