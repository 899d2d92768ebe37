//! Health and browser-noise handlers.

use axum::{
    http::{StatusCode, Uri},
    Json,
};

use crate::error::DreamEchoError;
use crate::web::dto::HealthResponse;
use crate::web::error::ApiError;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "DreamEcho Backend";

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /favicon.ico, /apple-touch-icon.png
pub async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Fallback for unknown routes.
pub async fn route_not_found(uri: Uri) -> ApiError {
    DreamEchoError::NotFound(format!("route {}", uri.path())).into()
}
