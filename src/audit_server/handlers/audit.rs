//! Audit endpoint handlers.
//!
//! Both handlers accept the raw body and pull fields out of a loose JSON
//! value rather than deserializing into a struct, because absent, null,
//! and wrong-typed fields each produce a different client-facing message.
//!
//! The audit work itself runs on a spawned task. A client that disconnects
//! mid-audit drops the handler future, but the spawned task keeps running
//! to completion so the subprocess finishes and the temp file is removed.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

use crate::app::{run_batch_audit, run_single_audit, validate_audit_url};
use crate::audit::ReportFormat;
use crate::config::{Settings, MAX_BATCH_URLS};

use super::super::types::{
    iso_timestamp, AuditFailureResponse, AuditResponse, BatchItem, BatchResponse, BatchSummary,
    ErrorBody,
};
use super::super::AppState;

/// `POST /audit` - runs one audit and returns the report inline.
pub async fn audit_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let payload = match parse_json_body(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let url = match required_url(&payload) {
        Ok(url) => url,
        Err(response) => return response,
    };
    if validate_audit_url(&url).is_err() {
        return bad_request("Invalid URL format");
    }
    let format = match requested_format(&payload) {
        Ok(format) => format,
        Err(response) => return response,
    };
    let upload = payload
        .get("uploadToDrive")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let folder_id = requested_folder_id(&payload, &state.settings);

    let task = {
        let state = state.clone();
        let url = url.clone();
        tokio::spawn(async move {
            run_single_audit(
                &state.settings,
                &state.resolver,
                state.drive.as_deref(),
                &url,
                format,
                upload,
                folder_id.as_deref(),
            )
            .await
        })
    };

    match task.await {
        Ok(Ok(success)) => Json(AuditResponse::from(success)).into_response(),
        Ok(Err(error)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AuditFailureResponse::new(url, error.to_string())),
        )
            .into_response(),
        Err(join_error) => internal_error(&state.settings, format!("Audit task failed: {join_error}")),
    }
}

/// `POST /audit/batch` - runs up to [`MAX_BATCH_URLS`] audits sequentially.
///
/// Always returns 200 once the batch runs; per-item failures live inside
/// the results list, not in the HTTP status.
pub async fn batch_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let payload = match parse_json_body(&body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let urls = match payload.get("urls") {
        Some(Value::Array(urls)) if !urls.is_empty() => urls.clone(),
        _ => return bad_request("URLs array is required and must not be empty"),
    };
    if urls.len() > MAX_BATCH_URLS {
        return bad_request(format!(
            "Maximum {} URLs per batch. Received: {}",
            MAX_BATCH_URLS,
            urls.len()
        ));
    }
    let format = match requested_format(&payload) {
        Ok(format) => format,
        Err(response) => return response,
    };
    let upload = payload
        .get("uploadToDrive")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let folder_id = requested_folder_id(&payload, &state.settings);

    let task = {
        let state = state.clone();
        tokio::spawn(async move {
            run_batch_audit(
                &state.settings,
                &state.resolver,
                state.drive.as_deref(),
                &urls,
                format,
                upload,
                folder_id.as_deref(),
            )
            .await
        })
    };

    match task.await {
        Ok(outcomes) => {
            let summary = BatchSummary::from_outcomes(&outcomes);
            let results: Vec<BatchItem> = outcomes.into_iter().map(BatchItem::from).collect();
            Json(BatchResponse {
                success: true,
                summary,
                results,
                timestamp: iso_timestamp(),
            })
            .into_response()
        }
        Err(join_error) => internal_error(&state.settings, format!("Batch task failed: {join_error}")),
    }
}

/// Parses the request body as a JSON object, treating an empty body as `{}`
/// so field-level messages apply instead of a parse error.
fn parse_json_body(body: &Bytes) -> Result<Value, Response> {
    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|_| bad_request("Malformed JSON body"))
}

fn required_url(payload: &Value) -> Result<String, Response> {
    match payload.get("url") {
        None | Some(Value::Null) => Err(bad_request("URL is required")),
        Some(Value::String(url)) if url.is_empty() => Err(bad_request("URL is required")),
        Some(Value::String(url)) => Ok(url.clone()),
        Some(_) => Err(bad_request("Invalid URL format")),
    }
}

fn requested_format(payload: &Value) -> Result<ReportFormat, Response> {
    match payload.get("format") {
        None | Some(Value::Null) => Ok(ReportFormat::default()),
        Some(Value::String(name)) => ReportFormat::from_name(name)
            .ok_or_else(|| bad_request(format!("Unsupported report format: {name}"))),
        Some(other) => Err(bad_request(format!("Unsupported report format: {other}"))),
    }
}

fn requested_folder_id(payload: &Value, settings: &Settings) -> Option<String> {
    payload
        .get("driveFolderId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| settings.drive_folder_id.clone())
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: "Bad Request",
            message: message.into(),
        }),
    )
        .into_response()
}

/// 500 with the underlying detail only in development mode.
fn internal_error(settings: &Settings, detail: String) -> Response {
    let message = if settings.development_mode() {
        detail
    } else {
        "An error occurred".to_string()
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "Internal Server Error",
            message,
        }),
    )
        .into_response()
}
