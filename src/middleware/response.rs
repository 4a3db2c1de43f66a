use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Wrapper for API responses that merges `"success": true` into the payload.
/// The payload must serialize to a JSON object.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut fields = match serde_json::to_value(&self.data) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                tracing::error!("Response payload is not an object: {}", other);
                return ApiError::internal_server_error().into_response();
            }
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::internal_server_error().into_response();
            }
        };

        fields.insert("success".to_string(), Value::Bool(true));
        (StatusCode::OK, Json(Value::Object(fields))).into_response()
    }
}

/// `{ "drinks": [...] }`
#[derive(Debug, Serialize)]
pub struct DrinksPayload<V: Serialize> {
    pub drinks: Vec<V>,
}

/// `{ "delete": id }`
#[derive(Debug, Serialize)]
pub struct DeletedPayload {
    pub delete: i64,
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
