//! Audit command resolution.
//!
//! The audit tool installs under one of two names depending on the platform
//! (`squirrel` for local installs, `squirrelscan` in container images). This
//! module probes the candidates in priority order and remembers the first
//! one that answers a version check.

use std::time::Duration;

use log::debug;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tokio::time::timeout;

use crate::error_handling::AuditError;

/// Resolves and caches the audit command name for the process lifetime.
///
/// Only a successful resolution is cached; a failed probe round is retried
/// on the next call, so installing the tool while the server runs is picked
/// up without a restart.
#[derive(Debug)]
pub struct CommandResolver {
    candidates: Vec<String>,
    probe_timeout: Duration,
    resolved: OnceCell<String>,
}

impl CommandResolver {
    /// Creates a resolver over the given candidate command names.
    pub fn new(candidates: Vec<String>, probe_timeout: Duration) -> Self {
        Self {
            candidates,
            probe_timeout,
            resolved: OnceCell::new(),
        }
    }

    /// Returns the resolved command name, probing on first use.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::ToolUnavailable`] when no candidate answers a
    /// version check within the probe timeout.
    pub async fn resolve(&self) -> Result<&str, AuditError> {
        let name = self
            .resolved
            .get_or_try_init(|| async {
                for candidate in &self.candidates {
                    if probe_version(candidate, self.probe_timeout).await.is_some() {
                        debug!("Resolved audit command: {candidate}");
                        return Ok(candidate.clone());
                    }
                }
                Err(AuditError::ToolUnavailable)
            })
            .await?;
        Ok(name.as_str())
    }
}

/// Runs `<name> --version` and returns the trimmed stdout on success.
///
/// Any failure (missing binary, nonzero exit, timeout) yields `None`.
pub async fn probe_version(name: &str, probe_timeout: Duration) -> Option<String> {
    let mut probe = Command::new(name);
    probe.arg("--version").kill_on_drop(true);

    match timeout(probe_timeout, probe.output()).await {
        Ok(Ok(output)) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
        }
        _ => None,
    }
}

/// Probes every candidate afresh and reports what the install check finds.
///
/// Returns `(version_text, command_name)`. Unlike [`CommandResolver`], this
/// never caches; it exists for the install-check endpoint, which must reflect
/// the current state of the host.
pub async fn version_report(candidates: &[String], probe_timeout: Duration) -> (String, String) {
    for candidate in candidates {
        if let Some(version) = probe_version(candidate, probe_timeout).await {
            return (version, candidate.clone());
        }
    }
    (
        "Error: Neither 'squirrel' nor 'squirrelscan' command found".to_string(),
        "none".to_string(),
    )
}
