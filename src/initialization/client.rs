//! HTTP client initialization.
//!
//! This module provides functions to initialize the HTTP client used for
//! Google API calls.

use std::time::Duration;

use reqwest::ClientBuilder;

/// Initializes the HTTP client with default settings.
///
/// Creates a `reqwest::Client` configured with:
/// - Request timeout (covers token exchange and report uploads)
/// - Redirect following enabled (reqwest default)
///
/// The client is internally reference-counted, so callers clone it freely.
///
/// # Arguments
///
/// * `timeout` - Per-request timeout
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub async fn init_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new().timeout(timeout).build()
}
