//! Audit server data structures.
//!
//! Response payloads for every endpoint. Field names and shapes are part of
//! the API contract consumed by automation clients, so serde renames pin the
//! camelCase wire names explicitly.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::app::{AuditSuccess, BatchOutcome};
use crate::audit::{CommandResolver, Metrics, ReportFormat};
use crate::config::Settings;
use crate::drive::{DriveClient, UploadInfo};

/// Shared state for the audit server.
///
/// Cloned per request; everything inside is behind an [`Arc`]. The resolver
/// carries the process-wide command cache, so it must be built once here
/// rather than per request.
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration.
    pub settings: Arc<Settings>,
    /// Cached audit tool resolution.
    pub resolver: Arc<CommandResolver>,
    /// Upload client, present only when credentials were configured.
    pub drive: Option<Arc<DriveClient>>,
}

impl AppState {
    /// Builds the shared state, wiring the resolver from the settings.
    pub fn new(settings: Settings, drive: Option<DriveClient>) -> Self {
        let resolver =
            CommandResolver::new(settings.tool_candidates.clone(), settings.probe_timeout);
        Self {
            settings: Arc::new(settings),
            resolver: Arc::new(resolver),
            drive: drive.map(Arc::new),
        }
    }
}

/// Current time in the wire format used by every timestamped response
/// (RFC 3339, millisecond precision, `Z` suffix).
pub(crate) fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Error payload for 400/401/500 responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Short error class, e.g. `Bad Request`.
    pub error: &'static str,
    /// Human-readable detail.
    pub message: String,
}

/// Payload for `GET /`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `running` when the server answers at all.
    pub status: &'static str,
    /// Service display name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Route map for discovery.
    pub endpoints: EndpointMap,
    /// Authentication requirements hint.
    pub authentication: &'static str,
}

/// Route map inside the health payload.
#[derive(Debug, Serialize)]
pub struct EndpointMap {
    /// Health check route.
    pub health: &'static str,
    /// Install-check route.
    pub test: &'static str,
    /// Single-audit route.
    pub audit: &'static str,
    /// Batch-audit route.
    pub batch: &'static str,
}

/// Payload for `GET /test`.
#[derive(Debug, Serialize)]
pub struct TestResponse {
    /// Always true; individual checks carry their own outcome.
    pub success: bool,
    /// Per-dependency check results.
    pub tests: TestChecks,
    /// Response time in wire format.
    pub timestamp: String,
}

/// Individual install-check results.
#[derive(Debug, Serialize)]
pub struct TestChecks {
    /// Server identity, `<name>/<version>`.
    pub server: String,
    /// Audit tool version string, or an error description.
    pub squirrelscan: String,
    /// Resolved command name, or `none`.
    pub command: String,
    /// `Configured` or `Not configured`.
    #[serde(rename = "googleDrive")]
    pub google_drive: String,
}

/// Payload for `404 Not Found`.
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    /// Always `Not Found`.
    pub error: &'static str,
    /// Which route was requested.
    pub message: String,
    /// Every route the server does serve.
    #[serde(rename = "availableEndpoints")]
    pub available_endpoints: &'static [&'static str],
}

/// Success payload for `POST /audit`.
///
/// `metrics` and `drive` serialize as explicit `null` when absent; clients
/// key off their presence rather than response variants.
#[derive(Debug, Serialize)]
pub struct AuditResponse {
    /// Always true on this payload.
    pub success: bool,
    /// The audited URL as submitted.
    pub url: String,
    /// Requested report format.
    pub format: ReportFormat,
    /// Report body, structured for parseable JSON.
    pub report: Value,
    /// Derived metrics, or null.
    pub metrics: Option<Metrics>,
    /// Upload links, or null.
    pub drive: Option<UploadInfo>,
    /// Report file name the audit ran with.
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Response time in wire format.
    pub timestamp: String,
}

impl From<AuditSuccess> for AuditResponse {
    fn from(s: AuditSuccess) -> Self {
        Self {
            success: true,
            url: s.url,
            format: s.format,
            report: s.report,
            metrics: s.metrics,
            drive: s.drive,
            file_name: s.file_name,
            timestamp: iso_timestamp(),
        }
    }
}

/// Failure payload for `POST /audit`.
#[derive(Debug, Serialize)]
pub struct AuditFailureResponse {
    /// Always false on this payload.
    pub success: bool,
    /// What went wrong, verbatim from the pipeline.
    pub error: String,
    /// The submitted URL.
    pub url: String,
    /// Response time in wire format.
    pub timestamp: String,
}

impl AuditFailureResponse {
    /// Builds the failure payload for one URL.
    pub fn new(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            url: url.into(),
            timestamp: iso_timestamp(),
        }
    }
}

/// Payload for `POST /audit/batch`.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    /// True when the batch ran, regardless of per-item outcomes.
    pub success: bool,
    /// Aggregate counts.
    pub summary: BatchSummary,
    /// Per-URL outcomes in submission order.
    pub results: Vec<BatchItem>,
    /// Response time in wire format.
    pub timestamp: String,
}

/// Aggregate counts over a finished batch.
#[derive(Debug, Serialize, PartialEq)]
pub struct BatchSummary {
    /// Number of submitted URLs.
    pub total: usize,
    /// Items that produced a report.
    pub succeeded: usize,
    /// Items that failed.
    pub failed: usize,
    /// Integer percentage with a `%` suffix, e.g. `67%`.
    #[serde(rename = "successRate")]
    pub success_rate: String,
}

impl BatchSummary {
    /// Derives the summary from per-item outcomes.
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let total = outcomes.len();
        let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        let rate = if total == 0 {
            0.0
        } else {
            (succeeded as f64 / total as f64) * 100.0
        };
        Self {
            total,
            succeeded,
            failed: total - succeeded,
            success_rate: format!("{}%", rate.round()),
        }
    }
}

/// One entry of a batch response.
///
/// Success and failure entries carry different field sets, so this
/// serializes untagged.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    /// The item produced a report.
    Success(BatchItemSuccess),
    /// The item failed; siblings are unaffected.
    Failure(BatchItemFailure),
}

/// Successful batch entry.
#[derive(Debug, Serialize)]
pub struct BatchItemSuccess {
    /// The audited URL.
    pub url: String,
    /// Always true on this variant.
    pub success: bool,
    /// Report body, structured for parseable JSON.
    pub report: Value,
    /// Report file name the audit ran with.
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Derived metrics, or null.
    pub metrics: Option<Metrics>,
    /// Upload links, or null.
    pub drive: Option<UploadInfo>,
}

/// Failed batch entry.
#[derive(Debug, Serialize)]
pub struct BatchItemFailure {
    /// The submitted entry.
    pub url: String,
    /// Always false on this variant.
    pub success: bool,
    /// What went wrong.
    pub error: String,
}

impl From<BatchOutcome> for BatchItem {
    fn from(outcome: BatchOutcome) -> Self {
        match outcome.result {
            Ok(s) => BatchItem::Success(BatchItemSuccess {
                url: s.url,
                success: true,
                report: s.report,
                file_name: s.file_name,
                metrics: s.metrics,
                drive: s.drive,
            }),
            Err(e) => BatchItem::Failure(BatchItemFailure {
                url: outcome.url,
                success: false,
                error: e.to_string(),
            }),
        }
    }
}
