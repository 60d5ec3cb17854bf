//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the application,
//! including timeouts, size limits, and other operational parameters.

use std::time::Duration;

/// Human-readable service name, reported by the health endpoint.
pub const SERVICE_NAME: &str = "SquirrelScan Audit API";

/// Header carrying the client's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Routes listed by the 404 handler.
pub const AVAILABLE_ENDPOINTS: &[&str] = &["GET /", "GET /test", "POST /audit", "POST /audit/batch"];

/// Default listening port when neither `PORT` nor `--port` is given.
pub const DEFAULT_PORT: u16 = 3000;

/// Candidate command names for the audit tool, in probe order.
///
/// `squirrel` is the local (Homebrew-style) install name; `squirrelscan` is
/// the name used by the Docker image. The first one that answers
/// `--version` wins and is cached for the process lifetime.
pub const AUDIT_COMMAND_CANDIDATES: &[&str] = &["squirrel", "squirrelscan"];

/// Timeout for a single `--version` probe while resolving the audit command.
pub const COMMAND_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Timeout for the version probe run by `GET /test`.
/// Longer than the resolver probe because this path reports the full
/// version string rather than just availability.
pub const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Wall-clock limit for one audit subprocess.
/// Exceeding it kills the child and fails that audit.
pub const AUDIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-stream cap on captured subprocess output in bytes (50MB).
/// Exceeding it kills the child and fails that audit.
pub const MAX_AUDIT_OUTPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Maximum number of URLs accepted by one `/audit/batch` request.
pub const MAX_BATCH_URLS: usize = 100;

/// Pause between consecutive batch items.
/// Deliberate throttle so a batch never runs more than one audit
/// subprocess at a time against the host.
pub const BATCH_ITEM_DELAY: Duration = Duration::from_secs(2);

/// Maximum length of the sanitized URL portion of a report file name.
pub const MAX_FILENAME_URL_CHARS: usize = 50;

/// Maximum accepted HTTP request body size in bytes (10MB).
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Timeout for outbound HTTP calls (token exchange, Drive upload).
pub const HTTP_CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

/// OAuth scope requested for Drive uploads: file-level write access only.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// Base URL for the Drive v3 multipart upload endpoint.
/// Overridable on the client so tests can point at a local mock.
pub const DRIVE_UPLOAD_BASE_URL: &str = "https://www.googleapis.com";

/// Lifetime in seconds of the signed JWT assertion sent to the token endpoint.
pub const DRIVE_TOKEN_TTL_SECS: i64 = 3600;
