//! Bounded audit subprocess execution.
//!
//! Runs the audit tool with a wall-clock timeout and a per-stream output
//! cap. Exceeding either bound kills the child; the caller only ever sees a
//! single subprocess error carrying the underlying message.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use log::info;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;

use crate::audit::types::ReportFormat;
use crate::error_handling::AuditError;

enum RunFailure {
    Overflow,
    Io(std::io::Error),
}

/// Runs `<tool> audit <url> --format <format> --output <path>`.
///
/// The report lands in `output_path`; stdout and stderr are captured only to
/// enforce the output cap and to surface diagnostics. Stderr from a
/// successful run is logged, not treated as failure.
///
/// # Errors
///
/// Returns [`AuditError::Subprocess`] on spawn failure, nonzero exit,
/// timeout, or output overflow.
pub async fn run_audit_command(
    tool: &str,
    url: &str,
    format: ReportFormat,
    output_path: &Path,
    run_timeout: Duration,
    max_output_bytes: u64,
) -> Result<(), AuditError> {
    info!(
        "Executing: {} audit {} --format {} --output {}",
        tool,
        url,
        format,
        output_path.display()
    );

    let mut cmd = Command::new(tool);
    cmd.arg("audit")
        .arg(url)
        .arg("--format")
        .arg(format.as_str())
        .arg("--output")
        .arg(output_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|e| AuditError::Subprocess(format!("Failed to start audit process: {e}")))?;

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(out), Some(err)) => (out, err),
        _ => {
            let _ = child.kill().await;
            return Err(AuditError::Subprocess(
                "Audit process pipes not captured".to_string(),
            ));
        }
    };

    // Output is drained inside the timeout so a chatty child can neither
    // stall on a full pipe nor grow the buffers unboundedly. try_join!
    // aborts the sibling read the moment one stream overflows.
    let bounded = timeout(run_timeout, async {
        let (_, stderr_buf) = tokio::try_join!(
            read_capped(stdout, max_output_bytes),
            read_capped(stderr, max_output_bytes)
        )?;
        let status = child.wait().await.map_err(RunFailure::Io)?;
        Ok((status, stderr_buf))
    })
    .await;

    match bounded {
        Err(_elapsed) => {
            let _ = child.kill().await;
            Err(AuditError::Subprocess(format!(
                "Audit timed out after {} seconds",
                run_timeout.as_secs()
            )))
        }
        Ok(Err(RunFailure::Overflow)) => {
            let _ = child.kill().await;
            Err(AuditError::Subprocess(format!(
                "Audit output exceeded {max_output_bytes} bytes"
            )))
        }
        Ok(Err(RunFailure::Io(e))) => {
            let _ = child.kill().await;
            Err(AuditError::Subprocess(format!(
                "Audit process I/O error: {e}"
            )))
        }
        Ok(Ok((status, stderr_buf))) => {
            let stderr_text = String::from_utf8_lossy(&stderr_buf);
            let stderr_text = stderr_text.trim();
            if status.success() {
                if !stderr_text.is_empty() {
                    info!("SquirrelScan stderr: {stderr_text}");
                }
                Ok(())
            } else if stderr_text.is_empty() {
                Err(AuditError::Subprocess(format!(
                    "Audit command failed ({status})"
                )))
            } else {
                Err(AuditError::Subprocess(format!(
                    "Audit command failed ({status}): {stderr_text}"
                )))
            }
        }
    }
}

// Reads at most cap+1 bytes; the extra byte flags an overflowing stream.
async fn read_capped<R: AsyncRead + Unpin>(stream: R, cap: u64) -> Result<Vec<u8>, RunFailure> {
    let mut buf = Vec::new();
    stream
        .take(cap.saturating_add(1))
        .read_to_end(&mut buf)
        .await
        .map_err(RunFailure::Io)?;
    if buf.len() as u64 > cap {
        return Err(RunFailure::Overflow);
    }
    Ok(buf)
}
