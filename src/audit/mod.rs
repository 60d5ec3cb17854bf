//! Audit engine.
//!
//! This module provides everything between an incoming URL and a finished
//! report:
//! - Command resolution (which tool name is installed)
//! - Bounded subprocess execution
//! - Metrics extraction from JSON reports

mod command;
mod metrics;
mod runner;
mod types;

// Re-export public API
pub use command::{probe_version, version_report, CommandResolver};
pub use metrics::{extract_metrics, IssueCount, Metrics, ScoreSummary};
pub use runner::run_audit_command;
pub use types::{ReportFormat, Severity};
