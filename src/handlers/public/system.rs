use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - service identification
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "name": "Coffee Shop API",
        "version": version,
        "endpoints": {
            "GET /drinks": "public",
            "GET /drinks-detail": "get:drinks-detail",
            "POST /drinks": "post:drinks",
            "PATCH /drinks/:id": "patch:drinks",
            "DELETE /drinks/:id": "delete:drinks",
            "GET /health": "public",
        }
    }))
}

/// GET /health - liveness plus a store round trip
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "store": "ok",
            "timestamp": now,
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("Drink store unavailable"))
        }
    }
}

/// Any unmatched route
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Known route, unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
