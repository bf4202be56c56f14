//! go-complexity-lint - complexity linter for Go.
//!
//! Measures four per-function metrics and reports the functions that exceed
//! configurable warn/fail thresholds:
//!
//! - nesting depth of control flow
//! - cyclomatic complexity
//! - parameter count
//! - fan-out (distinct non-standard-library functions called)
//!
//! Error guard clauses (`if err != nil { return ..., err }`) are exempt from
//! nesting depth and cyclomatic complexity. A function can raise its own
//! limits with a `//complexity:<metric>:warn=N,fail=M` doc comment.
//!
//! # Architecture
//!
//! - `analysis`: tree-sitter Go frontend, package loading, call resolution
//! - `syntax`: the lowered Go syntax the metrics operate on
//! - `metrics`: the analyzers, thresholds and override resolution
//! - `detect`: runs the metrics over loaded packages
//! - `config`: YAML config file and threshold layering
//! - `report`: output formatting (text, pretty, JSON, SARIF)

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod metrics;
pub mod report;
pub mod syntax;

#[cfg(test)]
mod test_utils;

pub use analysis::{AnalysisContext, GoFrontend, LoadError, Package};
pub use config::{Config, ConfigError};
pub use detect::{DetectionResult, Runner, Severity, Violation};
pub use metrics::{Engine, Finding, Metric, MetricSettings, Thresholds, Zone};
