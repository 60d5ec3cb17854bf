//! Audit orchestration.
//!
//! Drives a URL through the full pipeline: resolve the tool, run it into a
//! temp file, read the report, derive metrics, optionally upload, clean up.
//! Batches run the same pipeline sequentially with a pause between items.

use std::path::Path;

use log::{error, info, warn};
use serde_json::Value;

use crate::audit::{extract_metrics, run_audit_command, CommandResolver, Metrics, ReportFormat};
use crate::config::Settings;
use crate::drive::{DriveClient, UploadInfo};
use crate::error_handling::AuditError;

mod url;

pub use url::{report_file_name, sanitize_url_for_filename, validate_audit_url};

/// Everything a finished audit carries back to the HTTP layer.
#[derive(Debug, Clone)]
pub struct AuditSuccess {
    /// The audited URL, exactly as submitted.
    pub url: String,
    /// Report format that was requested.
    pub format: ReportFormat,
    /// Report body: a structured value for parseable JSON, raw text otherwise.
    pub report: Value,
    /// Derived metrics; absent for non-JSON formats and unparseable reports.
    pub metrics: Option<Metrics>,
    /// Upload outcome; absent when upload was skipped or failed.
    pub drive: Option<UploadInfo>,
    /// Name of the (already deleted) temporary report file.
    pub file_name: String,
}

/// Per-URL outcome within a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// The submitted entry, stringified for non-string entries.
    pub url: String,
    /// The item's audit result; failures never abort sibling items.
    pub result: Result<AuditSuccess, AuditError>,
}

/// Runs one audit end to end.
///
/// The temporary report file is removed before this returns, on success and
/// failure alike. Upload failures are logged and leave `drive` empty; they
/// never fail the audit.
///
/// # Errors
///
/// Returns [`AuditError`] for an invalid URL, an unavailable tool, or a
/// failed subprocess.
pub async fn run_single_audit(
    settings: &Settings,
    resolver: &CommandResolver,
    drive: Option<&DriveClient>,
    url: &str,
    format: ReportFormat,
    upload: bool,
    folder_id: Option<&str>,
) -> Result<AuditSuccess, AuditError> {
    validate_audit_url(url)?;

    info!("Starting audit for: {url}");

    let file_name = report_file_name(url, format);
    let output_path = settings.temp_dir.join(&file_name);

    let result = produce_audit(
        settings,
        resolver,
        drive,
        url,
        format,
        upload,
        folder_id,
        &file_name,
        &output_path,
    )
    .await;

    // Cleanup runs on every exit path; a missing file is not an error.
    let _ = tokio::fs::remove_file(&output_path).await;

    if let Err(e) = &result {
        error!("Audit error for {url}: {e}");
    }
    result
}

#[allow(clippy::too_many_arguments)]
async fn produce_audit(
    settings: &Settings,
    resolver: &CommandResolver,
    drive: Option<&DriveClient>,
    url: &str,
    format: ReportFormat,
    upload: bool,
    folder_id: Option<&str>,
    file_name: &str,
    output_path: &Path,
) -> Result<AuditSuccess, AuditError> {
    let tool = resolver.resolve().await?;

    run_audit_command(
        tool,
        url,
        format,
        output_path,
        settings.audit_timeout,
        settings.max_output_bytes,
    )
    .await?;

    let report_text = tokio::fs::read_to_string(output_path)
        .await
        .map_err(|e| AuditError::Subprocess(format!("Failed to read audit report: {e}")))?;

    info!("Audit completed for: {url}");

    let metrics = extract_metrics(&report_text, format);

    let mut upload_info = None;
    if upload {
        match drive {
            None => info!("Skipping Drive upload - not configured"),
            Some(client) => {
                info!("Uploading to Google Drive...");
                match client.upload_report(output_path, file_name, folder_id).await {
                    Ok(info) => {
                        match &info.view_link {
                            Some(link) => info!("Upload successful: {link}"),
                            None => info!("Upload successful"),
                        }
                        upload_info = Some(info);
                    }
                    Err(e) => error!("Drive upload failed: {e}"),
                }
            }
        }
    }

    Ok(AuditSuccess {
        url: url.to_string(),
        format,
        report: parse_report_body(report_text, format),
        metrics,
        drive: upload_info,
        file_name: file_name.to_string(),
    })
}

// JSON reports are returned structured; anything unparseable falls back to
// raw text with a warning.
fn parse_report_body(text: String, format: ReportFormat) -> Value {
    if format == ReportFormat::Json {
        match serde_json::from_str(&text) {
            Ok(value) => return value,
            Err(e) => warn!("Failed to parse JSON report: {e}"),
        }
    }
    Value::String(text)
}

/// Runs a batch of audits sequentially, pausing between items.
///
/// Entries that are not strings, or fail validation, become per-item
/// failures; one item never aborts its siblings. Outcomes preserve the
/// submitted order.
pub async fn run_batch_audit(
    settings: &Settings,
    resolver: &CommandResolver,
    drive: Option<&DriveClient>,
    urls: &[Value],
    format: ReportFormat,
    upload: bool,
    folder_id: Option<&str>,
) -> Vec<BatchOutcome> {
    info!("Starting batch audit for {} URLs", urls.len());

    let mut outcomes = Vec::with_capacity(urls.len());
    for (i, entry) in urls.iter().enumerate() {
        let display_url = match entry.as_str() {
            Some(s) => s.to_string(),
            None => entry.to_string(),
        };

        info!("[{}/{}] Auditing: {}", i + 1, urls.len(), display_url);

        let result = match entry.as_str() {
            Some(url) => {
                run_single_audit(settings, resolver, drive, url, format, upload, folder_id).await
            }
            None => Err(AuditError::InvalidUrl),
        };

        match &result {
            Ok(_) => info!("✓ Completed: {display_url}"),
            Err(e) => error!("✗ Failed: {display_url} - {e}"),
        }

        outcomes.push(BatchOutcome {
            url: display_url,
            result,
        });

        if i < urls.len() - 1 {
            tokio::time::sleep(settings.batch_delay).await;
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
    info!(
        "Batch complete: {} succeeded, {} failed",
        succeeded,
        outcomes.len() - succeeded
    );

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn reporting_script(dir: &Path, report: &str) -> PathBuf {
        write_script(
            dir,
            "fakescan",
            &format!(
                r#"if [ "$1" = "--version" ]; then echo "fakescan 1.0.0"; exit 0; fi
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; shift; fi
  shift
done
printf '%s' '{report}' > "$out""#
            ),
        )
    }

    fn test_settings(temp_dir: &Path) -> Settings {
        Settings {
            api_key: "secret".to_string(),
            temp_dir: temp_dir.to_path_buf(),
            audit_timeout: Duration::from_secs(5),
            batch_delay: Duration::from_millis(10),
            ..Settings::default()
        }
    }

    fn resolver_for(tool: &Path) -> CommandResolver {
        CommandResolver::new(
            vec![tool.to_str().unwrap().to_string()],
            Duration::from_secs(3),
        )
    }

    fn leftover_reports(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("audit_"))
            })
            .collect()
    }

    #[tokio::test]
    async fn test_single_audit_json_success() {
        let dir = TempDir::new().unwrap();
        let tool = reporting_script(
            dir.path(),
            r#"{"score":{"overall":87,"grade":"B+"},"issues":[{"severity":"error"}]}"#,
        );
        let settings = test_settings(dir.path());
        let resolver = resolver_for(&tool);

        let success = run_single_audit(
            &settings,
            &resolver,
            None,
            "https://example.com",
            ReportFormat::Json,
            false,
            None,
        )
        .await
        .unwrap();

        assert_eq!(success.url, "https://example.com");
        assert_eq!(success.format, ReportFormat::Json);
        // Parseable JSON comes back structured, not as a string
        assert_eq!(success.report["score"]["overall"], json!(87));
        let metrics = success.metrics.unwrap();
        assert_eq!(metrics.summary.grade, "B+");
        assert_eq!(metrics.issue_count.error, 1);
        assert!(success.drive.is_none());
        assert!(success.file_name.starts_with("audit_example_com_"));
        // Temp report is gone
        assert!(leftover_reports(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_single_audit_html_returns_raw_text() {
        let dir = TempDir::new().unwrap();
        let tool = reporting_script(dir.path(), "<html><body>ok</body></html>");
        let settings = test_settings(dir.path());
        let resolver = resolver_for(&tool);

        let success = run_single_audit(
            &settings,
            &resolver,
            None,
            "https://example.com",
            ReportFormat::Html,
            false,
            None,
        )
        .await
        .unwrap();

        assert_eq!(
            success.report,
            Value::String("<html><body>ok</body></html>".to_string())
        );
        assert!(success.metrics.is_none());
        assert!(success.file_name.ends_with(".html"));
    }

    #[tokio::test]
    async fn test_single_audit_malformed_json_falls_back_to_text() {
        let dir = TempDir::new().unwrap();
        let tool = reporting_script(dir.path(), "this is not json");
        let settings = test_settings(dir.path());
        let resolver = resolver_for(&tool);

        let success = run_single_audit(
            &settings,
            &resolver,
            None,
            "https://example.com",
            ReportFormat::Json,
            false,
            None,
        )
        .await
        .unwrap();

        assert_eq!(
            success.report,
            Value::String("this is not json".to_string())
        );
        assert!(success.metrics.is_none());
    }

    #[tokio::test]
    async fn test_single_audit_rejects_invalid_url_before_running() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        // Resolver would fail, proving validation happens first
        let resolver = CommandResolver::new(vec![], Duration::from_secs(1));

        let err = run_single_audit(
            &settings,
            &resolver,
            None,
            "example.com",
            ReportFormat::Json,
            false,
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AuditError::InvalidUrl));
        assert!(leftover_reports(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_single_audit_tool_unavailable() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        let resolver = CommandResolver::new(
            vec!["no-such-tool-anywhere".to_string()],
            Duration::from_secs(1),
        );

        let err = run_single_audit(
            &settings,
            &resolver,
            None,
            "https://example.com",
            ReportFormat::Json,
            false,
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AuditError::ToolUnavailable));
    }

    #[tokio::test]
    async fn test_single_audit_subprocess_failure_cleans_up() {
        let dir = TempDir::new().unwrap();
        let tool = write_script(
            dir.path(),
            "broken",
            r#"if [ "$1" = "--version" ]; then echo "fakescan 1.0.0"; exit 0; fi
echo boom >&2; exit 1"#,
        );
        let settings = test_settings(dir.path());
        let resolver = resolver_for(&tool);

        let err = run_single_audit(
            &settings,
            &resolver,
            None,
            "https://example.com",
            ReportFormat::Json,
            false,
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AuditError::Subprocess(_)));
        assert!(err.to_string().contains("boom"));
        assert!(leftover_reports(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_single_audit_missing_report_file_is_subprocess_failure() {
        let dir = TempDir::new().unwrap();
        // Exits zero without writing the output file
        let tool = write_script(dir.path(), "amnesiac", "exit 0");
        let settings = test_settings(dir.path());
        let resolver = resolver_for(&tool);

        let err = run_single_audit(
            &settings,
            &resolver,
            None,
            "https://example.com",
            ReportFormat::Json,
            false,
            None,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Failed to read audit report"));
    }

    #[tokio::test]
    async fn test_single_audit_upload_requested_without_drive_succeeds() {
        let dir = TempDir::new().unwrap();
        let tool = reporting_script(dir.path(), "{}");
        let settings = test_settings(dir.path());
        let resolver = resolver_for(&tool);

        let success = run_single_audit(
            &settings,
            &resolver,
            None,
            "https://example.com",
            ReportFormat::Json,
            true,
            None,
        )
        .await
        .unwrap();

        // Upload is skipped, not failed
        assert!(success.drive.is_none());
    }

    #[tokio::test]
    async fn test_batch_isolates_failures_and_keeps_order() {
        let dir = TempDir::new().unwrap();
        let tool = reporting_script(dir.path(), "{}");
        let settings = test_settings(dir.path());
        let resolver = resolver_for(&tool);

        let urls = vec![
            json!("https://one.example.com"),
            json!("not a valid url"),
            json!("https://two.example.com"),
        ];

        let outcomes = run_batch_audit(
            &settings,
            &resolver,
            None,
            &urls,
            ReportFormat::Json,
            false,
            None,
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].url, "https://one.example.com");
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(AuditError::InvalidUrl)));
        assert!(outcomes[2].result.is_ok());
    }

    #[tokio::test]
    async fn test_batch_non_string_entry_fails_individually() {
        let dir = TempDir::new().unwrap();
        let tool = reporting_script(dir.path(), "{}");
        let settings = test_settings(dir.path());
        let resolver = resolver_for(&tool);

        let urls = vec![json!(42), json!("https://example.com")];

        let outcomes = run_batch_audit(
            &settings,
            &resolver,
            None,
            &urls,
            ReportFormat::Json,
            false,
            None,
        )
        .await;

        assert_eq!(outcomes[0].url, "42");
        assert!(matches!(outcomes[0].result, Err(AuditError::InvalidUrl)));
        assert!(outcomes[1].result.is_ok());
    }
}
