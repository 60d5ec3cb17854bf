//! HTTP surface for the audit service.
//!
//! Routes:
//! - `GET /` - health check and route map, unauthenticated
//! - `GET /test` - dependency install check
//! - `POST /audit` - single URL audit
//! - `POST /audit/batch` - sequential multi-URL audit
//!
//! Everything except the health check requires the `x-api-key` header.
//! Unmatched routes, and matched routes hit with the wrong method, both
//! answer with the 404 payload listing the available endpoints.

mod auth;
mod handlers;
mod types;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use log::info;

use crate::config::{Settings, HTTP_CLIENT_TIMEOUT, MAX_REQUEST_BODY_BYTES, SERVICE_NAME};
use crate::drive::DriveClient;
use crate::error_handling::InitializationError;
use crate::initialization::init_http_client;

use auth::require_api_key;
use handlers::{audit_handler, batch_handler, health_handler, not_found_handler, test_handler};
pub use types::AppState;

/// Builds the full route table over the given state.
///
/// The method-not-allowed fallback is attached to each sub-router before
/// its middleware so the API key check still runs on wrong-method requests
/// to protected paths.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/test", get(test_handler))
        .route("/audit", post(audit_handler))
        .route("/audit/batch", post(batch_handler))
        .method_not_allowed_fallback(not_found_handler)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/", get(health_handler))
        .method_not_allowed_fallback(not_found_handler)
        .merge(protected)
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}

/// Starts the audit server and runs it until a termination signal arrives.
///
/// Builds the Drive client when credentials are configured, binds the
/// listener, then serves. Termination signals stop the server promptly
/// without draining in-flight requests.
pub async fn run_server(settings: Settings) -> Result<(), anyhow::Error> {
    let drive = match settings.drive_key.clone() {
        Some(key) => {
            let http = init_http_client(HTTP_CLIENT_TIMEOUT)
                .await
                .map_err(InitializationError::HttpClientError)?;
            Some(DriveClient::new(http, key))
        }
        None => {
            info!("Google Drive not configured - skipping Drive uploads");
            None
        }
    };

    let port = settings.port;
    let environment = settings.environment_name().to_string();
    let drive_configured = settings.drive_configured();
    let folder_id = settings.drive_folder_id.clone();

    let state = AppState::new(settings, drive);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind audit server to port {}: {}", port, e))?;

    info!("🚀 {} running on port {}", SERVICE_NAME, port);
    info!("📊 Environment: {}", environment);
    info!("🔐 Authentication: API key required (x-api-key header)");
    info!(
        "☁️ Google Drive: {}",
        if drive_configured {
            "Configured"
        } else {
            "Not configured"
        }
    );
    info!(
        "📁 Drive Folder ID: {}",
        folder_id.as_deref().unwrap_or("Not set")
    );
    info!("Ready to process audits! 🎯");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result.map_err(|e| anyhow::anyhow!("Audit server error: {}", e))?;
        }
        signal = wait_for_shutdown_signal() => {
            info!("{} received, shutting down gracefully...", signal);
        }
    }

    Ok(())
}

/// Resolves when a termination signal arrives, naming the signal.
///
/// On Unix this watches SIGTERM and SIGINT separately; elsewhere only
/// Ctrl+C is available.
async fn wait_for_shutdown_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        "SIGINT"
    }
}
