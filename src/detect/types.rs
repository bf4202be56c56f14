//! Core types for detection results.

use serde::{Deserialize, Serialize};

use crate::metrics::{Finding, Metric, Thresholds};

/// Severity levels for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single reported diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: Metric,
    pub message: String,
    /// Path relative to the working directory.
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    /// Display name of the offending function.
    pub function: String,
    pub value: usize,
    /// Thresholds in effect for the function (after overrides).
    pub thresholds: Thresholds,
}

impl Violation {
    pub fn from_finding(file: &str, finding: Finding) -> Self {
        Self {
            rule: finding.metric,
            message: finding.message,
            file: file.to_string(),
            line: finding.position.line,
            column: finding.position.column,
            severity: finding.severity,
            function: finding.function,
            value: finding.value,
            thresholds: finding.thresholds,
        }
    }

    /// Ordering used for every report: file, line, column, metric.
    fn sort_key(&self) -> (&str, usize, usize, Metric) {
        (&self.file, self.line, self.column, self.rule)
    }
}

/// Results of running detection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionResult {
    pub violations: Vec<Violation>,
    /// Number of files scanned
    pub scanned: usize,
    /// Number of function bodies measured
    pub functions: usize,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: DetectionResult) {
        self.violations.extend(other.violations);
        self.scanned += other.scanned;
        self.functions += other.functions;
    }

    /// Add a violation to the result.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Put violations in report order.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    /// Check if there are any error-severity violations.
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}
