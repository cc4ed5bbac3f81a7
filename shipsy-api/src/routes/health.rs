/// Service status endpoints
///
/// Public, unauthenticated endpoints:
///
/// - `GET /` - Banner
/// - `GET /health` - Health check including store connectivity
/// - `GET /info` - Service description
///
/// Also hosts the JSON fallback for unknown routes.
///
/// # Example
///
/// ```text
/// GET /health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "storage": "connected"
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Banner response
#[derive(Debug, Serialize, Deserialize)]
pub struct HomeResponse {
    pub message: String,
    pub version: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Storage status
    pub storage: String,
}

/// Service info response
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<String>,
}

/// Banner handler
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Shipsy API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check handler
///
/// Returns service health status including store connectivity. A store
/// failure degrades the status but still answers 200.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    // Check store connectivity
    let storage_status = match state.shipments.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            "disconnected"
        }
    };

    Ok(Json(HealthResponse {
        status: if storage_status == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: storage_status.to_string(),
    }))
}

/// Service info handler
pub async fn info() -> Json<InfoResponse> {
    let endpoints = [
        "POST /auth/signup",
        "POST /auth/login",
        "GET /auth/fetch",
        "GET /shipment",
        "POST /shipment",
        "GET /shipment/my",
        "GET /shipment/:id",
        "PATCH /shipment/:id",
        "DELETE /shipment/:id",
    ];

    Json(InfoResponse {
        name: "shipsy-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Shipment management service".to_string(),
        endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
    })
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
