//! Report metrics extraction.
//!
//! Derives headline metrics from a JSON audit report. Every field is read
//! defensively: a missing or mistyped value becomes a neutral default, never
//! an error surfaced to the caller.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::audit::types::{ReportFormat, Severity};

/// Headline metrics derived from a JSON report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Per-category score mapping, passed through from the report.
    pub scores: Map<String, Value>,
    /// Rolled-up result summary.
    pub summary: ScoreSummary,
    /// Issue counts keyed by recognized severity.
    pub issue_count: IssueCount,
}

/// Rolled-up audit result summary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreSummary {
    /// Overall score; 0 when the report carries none.
    pub overall: Number,
    /// Letter grade; "N/A" when the report carries none.
    pub grade: String,
    /// Count of passed checks.
    pub passed: u64,
    /// Count of checks that passed with warnings.
    pub warnings: u64,
    /// Count of failed checks.
    pub failed: u64,
}

/// Issue counts per recognized severity tag.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct IssueCount {
    /// Issues tagged `error`.
    pub error: u64,
    /// Issues tagged `warning`.
    pub warning: u64,
    /// Issues tagged `info`.
    pub info: u64,
}

/// Extracts metrics from a report body.
///
/// Only JSON reports are interpreted; every other format yields `None`, as
/// does a body that fails to parse.
pub fn extract_metrics(report: &str, format: ReportFormat) -> Option<Metrics> {
    if format != ReportFormat::Json {
        return None;
    }

    let data: Value = serde_json::from_str(report).ok()?;
    Some(metrics_from_report(&data))
}

fn metrics_from_report(data: &Value) -> Metrics {
    let score = data.get("score");
    let summary = data.get("summary");

    Metrics {
        scores: score
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        summary: ScoreSummary {
            overall: number_or_zero(score.and_then(|s| s.get("overall"))),
            grade: score
                .and_then(|s| s.get("grade"))
                .and_then(Value::as_str)
                .unwrap_or("N/A")
                .to_string(),
            passed: u64_or_zero(summary.and_then(|s| s.get("passed"))),
            warnings: u64_or_zero(summary.and_then(|s| s.get("warnings"))),
            failed: u64_or_zero(summary.and_then(|s| s.get("failed"))),
        },
        issue_count: count_issues(data.get("issues")),
    }
}

fn count_issues(issues: Option<&Value>) -> IssueCount {
    let mut counts = IssueCount::default();
    let Some(issues) = issues.and_then(Value::as_array) else {
        return counts;
    };

    for issue in issues {
        let tag = issue.get("severity").and_then(Value::as_str);
        match tag.and_then(Severity::from_tag) {
            Some(Severity::Error) => counts.error += 1,
            Some(Severity::Warning) => counts.warning += 1,
            Some(Severity::Info) => counts.info += 1,
            // Unrecognized severities stay out of every count
            None => {}
        }
    }

    counts
}

// Preserves integer-vs-float representation from the report.
fn number_or_zero(value: Option<&Value>) -> Number {
    match value {
        Some(Value::Number(n)) => n.clone(),
        _ => Number::from(0),
    }
}

fn u64_or_zero(value: Option<&Value>) -> u64 {
    value.and_then(Value::as_u64).unwrap_or(0)
}
