//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for environment-derived settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A required environment variable is absent or empty.
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Error types for a single audit run.
///
/// The `Display` text of each variant is exactly what the HTTP layer
/// reports in the `error` field of a failure response.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The submitted URL does not parse as an absolute URL.
    #[error("Invalid URL format")]
    InvalidUrl,

    /// Neither audit command candidate responded to a version probe.
    #[error("SquirrelScan is not installed. Neither 'squirrel' nor 'squirrelscan' command found.")]
    ToolUnavailable,

    /// The audit subprocess failed: nonzero exit, timeout, output overflow,
    /// or an unreadable report file. Carries the underlying message verbatim.
    #[error("{0}")]
    Subprocess(String),
}

/// Error types for Google Drive uploads.
///
/// A missing configuration is not represented here: without credentials no
/// upload client exists in the first place, so these only cover failures of
/// an attempted upload.
#[derive(Error, Debug)]
pub enum DriveError {
    /// The service-account key JSON did not parse.
    #[error("Invalid service account key: {0}")]
    InvalidKey(#[from] serde_json::Error),

    /// Signing the OAuth JWT assertion failed.
    #[error("Token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// The token endpoint rejected the assertion.
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// The upload endpoint returned a non-success status.
    #[error("Upload request failed: {0}")]
    Upload(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] ReqwestError),

    /// Reading the local report file failed.
    #[error("File read error: {0}")]
    Io(#[from] std::io::Error),
}
