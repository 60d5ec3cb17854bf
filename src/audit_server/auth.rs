//! API key authentication.
//!
//! Every route except the health check sits behind an `x-api-key` header
//! check. Keys are configured once at startup; there is no per-key identity
//! or rate limiting, just a shared secret gate.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;

use crate::config::API_KEY_HEADER;

use super::types::ErrorBody;
use super::AppState;

/// Rejects requests whose `x-api-key` header is missing or wrong.
///
/// A missing or unreadable header and a wrong key produce distinct
/// messages so clients can tell a misconfigured integration from a
/// revoked key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());

    match presented {
        None => {
            warn!(
                "Rejected request to {} without {} header",
                request.uri().path(),
                API_KEY_HEADER
            );
            unauthorized(format!("{API_KEY_HEADER} header is required"))
        }
        Some(key) if key != state.settings.api_key => {
            warn!("Rejected request to {} with wrong API key", request.uri().path());
            unauthorized("Invalid API key".to_string())
        }
        Some(_) => next.run(request).await,
    }
}

fn unauthorized(message: String) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: "Unauthorized",
            message,
        }),
    )
        .into_response()
}
