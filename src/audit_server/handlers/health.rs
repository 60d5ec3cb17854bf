//! Health check and fallback handlers.

use axum::http::{Method, StatusCode, Uri};
use axum::Json;

use crate::config::{AVAILABLE_ENDPOINTS, SERVICE_NAME};

use super::super::types::{EndpointMap, HealthResponse, NotFoundResponse};

/// `GET /` - service identity and route map. The only unauthenticated
/// route, so load balancers can probe it without credentials.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointMap {
            health: "GET /",
            test: "GET /test",
            audit: "POST /audit",
            batch: "POST /audit/batch",
        },
        authentication: "Required: x-api-key header",
    })
}

/// Fallback for unmatched routes and unsupported methods.
pub async fn not_found_handler(method: Method, uri: Uri) -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not Found",
            message: format!("Route {} {} not found", method, uri.path()),
            available_endpoints: AVAILABLE_ENDPOINTS,
        }),
    )
}
