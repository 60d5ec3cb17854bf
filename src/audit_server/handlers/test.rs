//! Install-check handler.

use axum::extract::State;
use axum::Json;

use crate::audit::version_report;

use super::super::types::{iso_timestamp, TestChecks, TestResponse};
use super::super::AppState;

/// `GET /test` - probes the audit tool and reports dependency status.
///
/// Probes run fresh on every call, bypassing the resolver cache, so a
/// tool installed after startup shows up here without a restart.
pub async fn test_handler(State(state): State<AppState>) -> Json<TestResponse> {
    let settings = &state.settings;
    let (squirrelscan, command) =
        version_report(&settings.tool_candidates, settings.version_check_timeout).await;

    let google_drive = if state.drive.is_some() {
        "Configured"
    } else {
        "Not configured"
    };

    Json(TestResponse {
        success: true,
        tests: TestChecks {
            server: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            squirrelscan,
            command,
            google_drive: google_drive.to_string(),
        },
        timestamp: iso_timestamp(),
    })
}
