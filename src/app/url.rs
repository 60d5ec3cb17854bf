//! URL validation and report file naming.

use chrono::Utc;

use crate::audit::ReportFormat;
use crate::config::MAX_FILENAME_URL_CHARS;
use crate::error_handling::AuditError;

/// Validates that a submitted URL parses as an absolute URL.
///
/// Any parseable absolute URL is accepted; the audit tool decides what it can
/// actually fetch. Scheme-less input such as `example.com` is rejected.
///
/// # Errors
///
/// Returns [`AuditError::InvalidUrl`] if the input does not parse.
pub fn validate_audit_url(raw: &str) -> Result<(), AuditError> {
    url::Url::parse(raw).map(|_| ()).map_err(|_| AuditError::InvalidUrl)
}

/// Sanitizes a URL for use inside a file name.
///
/// Strips a leading `http://` or `https://`, replaces every character that is
/// not ASCII-alphanumeric with an underscore, and truncates the result to
/// [`MAX_FILENAME_URL_CHARS`] characters.
pub fn sanitize_url_for_filename(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    stripped
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_FILENAME_URL_CHARS)
        .collect()
}

/// Builds the temporary report file name for one audit run.
///
/// Format: `audit_<sanitized-url>_<millis>.<ext>`. The millisecond timestamp
/// keeps concurrent runs for different instants apart; two runs for the
/// identical URL within the same millisecond would collide.
pub fn report_file_name(url: &str, format: ReportFormat) -> String {
    format!(
        "audit_{}_{}.{}",
        sanitize_url_for_filename(url),
        Utc::now().timestamp_millis(),
        format.extension()
    )
}
