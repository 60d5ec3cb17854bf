//! audit_gateway library: HTTP API around the SquirrelScan audit tool
//!
//! This library wraps an installed SquirrelScan binary in a small JSON API.
//! It resolves which command name is installed, runs audits as bounded
//! subprocesses, derives summary metrics from JSON reports, and optionally
//! uploads reports to Google Drive via a service account.
//!
//! # Example
//!
//! ```no_run
//! use audit_gateway::{run_server, Settings};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut settings = Settings::from_env()?;
//! settings.port = 8080;
//!
//! run_server(settings).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod app;
mod audit;
mod audit_server;
pub mod config;
mod drive;
mod error_handling;
pub mod initialization;

// Re-export public API
pub use audit::{extract_metrics, CommandResolver, IssueCount, Metrics, ReportFormat, ScoreSummary};
pub use audit_server::{build_router, run_server, AppState};
pub use config::{Config, LogFormat, LogLevel, Settings};
pub use drive::{DriveClient, ServiceAccountKey, UploadInfo};
pub use error_handling::{AuditError, DriveError, InitializationError, SettingsError};
