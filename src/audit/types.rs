//! Audit domain types.
//!
//! This module defines the report format accepted by the audit tool and the
//! severity tags used when counting report issues.

use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;

/// Report output formats supported by the audit tool.
///
/// The lowercase name doubles as the `--format` argument and the report file
/// extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, EnumIterMacro)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Machine-readable report; the only format metrics are derived from.
    #[default]
    Json,
    /// Standalone HTML report.
    Html,
    /// Markdown report.
    Markdown,
    /// Flat CSV issue listing.
    Csv,
}

impl ReportFormat {
    /// Parses a lowercase format name. Returns `None` for anything else.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(ReportFormat::Json),
            "html" => Some(ReportFormat::Html),
            "markdown" => Some(ReportFormat::Markdown),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }

    /// Returns the lowercase format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Csv => "csv",
        }
    }

    /// Returns the file extension for this format (same as the name).
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tags recognized on report issue records.
///
/// Issues carrying any other tag are excluded from all counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum Severity {
    /// A failed check.
    Error,
    /// A check that passed with caveats.
    Warning,
    /// A purely informational note.
    Info,
}

impl Severity {
    /// Parses the severity tag found on an issue record.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }

    /// Returns the lowercase tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
