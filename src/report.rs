//! Output formatting for lint results.
//!
//! Supports four output formats:
//! - Text: one `path:line:col: message` line per diagnostic on stderr
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use std::io::Write;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::detect::{DetectionResult, Severity, Violation};
use crate::metrics::{Metric, MetricSettings};

/// Output formats accepted by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Pretty,
    Json,
    Sarif,
}

// =============================================================================
// Text Format
// =============================================================================

/// Render one diagnostic per line.
pub fn render_text(result: &DetectionResult) -> String {
    let mut out = String::new();
    for v in &result.violations {
        out.push_str(&format!("{}:{}:{}: {}\n", v.file, v.line, v.column, v.message));
    }
    out
}

/// Write results in text format to stderr.
pub fn write_text(result: &DetectionResult) -> anyhow::Result<()> {
    let mut stderr = std::io::stderr().lock();
    stderr.write_all(render_text(result).as_bytes())?;
    stderr.flush()?;
    Ok(())
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub patterns: Vec<String>,
    /// Default thresholds in effect (before per-function overrides).
    pub thresholds: JsonThresholds,
    pub passed: bool,
    pub files_scanned: usize,
    pub functions_analyzed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub violations: Vec<JsonViolation>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonThresholds {
    pub nestdepth: JsonBounds,
    pub cyclo: JsonBounds,
    pub params: JsonBounds,
    pub fanout: JsonBounds,
}

#[derive(Serialize, Deserialize)]
pub struct JsonBounds {
    pub warn: i64,
    pub fail: i64,
}

#[derive(Serialize, Deserialize)]
pub struct JsonViolation {
    pub rule: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub function: String,
    pub value: usize,
    pub warn: i64,
    pub fail: i64,
    pub message: String,
}

fn bounds(settings: &MetricSettings, metric: Metric) -> JsonBounds {
    let th = settings.get(metric);
    JsonBounds {
        warn: th.warn_at,
        fail: th.fail_at,
    }
}

fn violation_to_json(v: &Violation) -> JsonViolation {
    JsonViolation {
        rule: v.rule.as_str().to_string(),
        severity: v.severity.to_string(),
        file: v.file.clone(),
        line: v.line,
        column: v.column,
        function: v.function.clone(),
        value: v.value,
        warn: v.thresholds.warn_at,
        fail: v.thresholds.fail_at,
        message: v.message.clone(),
    }
}

pub fn render_json(
    patterns: &[String],
    settings: &MetricSettings,
    result: &DetectionResult,
) -> anyhow::Result<String> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        patterns: patterns.to_vec(),
        thresholds: JsonThresholds {
            nestdepth: bounds(settings, Metric::NestDepth),
            cyclo: bounds(settings, Metric::Cyclo),
            params: bounds(settings, Metric::Params),
            fanout: bounds(settings, Metric::FanOut),
        },
        passed: !result.has_errors(),
        files_scanned: result.scanned,
        functions_analyzed: result.functions,
        errors: result.error_count(),
        warnings: result.warning_count(),
        violations: result.violations.iter().map(violation_to_json).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write results in JSON format.
pub fn write_json(
    patterns: &[String],
    settings: &MetricSettings,
    result: &DetectionResult,
) -> anyhow::Result<()> {
    println!("{}", render_json(patterns, settings, result)?);
    Ok(())
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "go-complexity-lint";

#[derive(Serialize, Deserialize)]
struct SarifReport {
    version: String,
    #[serde(rename = "$schema")]
    schema: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
struct SarifRule {
    id: String,
    name: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "fullDescription")]
    full_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
struct SarifRuleConfig {
    level: String,
}

#[derive(Serialize, Deserialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifact,
    region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
struct SarifArtifact {
    uri: String,
}

#[derive(Serialize, Deserialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn")]
    start_column: usize,
}

fn rule_name(metric: Metric) -> &'static str {
    match metric {
        Metric::NestDepth => "NestingDepth",
        Metric::Cyclo => "CyclomaticComplexity",
        Metric::Params => "ParameterCount",
        Metric::FanOut => "FanOut",
    }
}

fn short_description(metric: Metric) -> &'static str {
    match metric {
        Metric::NestDepth => "Function nests control flow too deeply",
        Metric::Cyclo => "Function has too many independent paths",
        Metric::Params => "Function takes too many parameters",
        Metric::FanOut => "Function calls too many distinct functions",
    }
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

pub fn render_sarif(result: &DetectionResult) -> anyhow::Result<String> {
    let rules: Vec<SarifRule> = Metric::ALL
        .iter()
        .map(|metric| SarifRule {
            id: metric.as_str().to_string(),
            name: rule_name(*metric).to_string(),
            short_description: SarifMessage {
                text: short_description(*metric).to_string(),
            },
            full_description: SarifMessage {
                text: metric.description().to_string(),
            },
            default_config: SarifRuleConfig {
                level: "warning".to_string(),
            },
        })
        .collect();

    let results: Vec<SarifResult> = result
        .violations
        .iter()
        .map(|v| SarifResult {
            rule_id: v.rule.as_str().to_string(),
            level: map_severity_to_level(v.severity).to_string(),
            message: SarifMessage {
                text: v.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: v.file.replace('\\', "/"),
                    },
                    region: SarifRegion {
                        start_line: v.line.max(1),
                        start_column: v.column.max(1),
                    },
                },
            }],
        })
        .collect();

    let report = SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write results in SARIF format.
pub fn write_sarif(result: &DetectionResult) -> anyhow::Result<()> {
    println!("{}", render_sarif(result)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(patterns: &[String], settings: &MetricSettings, result: &DetectionResult) {
    // Header
    println!();
    print!("  ");
    print!("{}", TOOL_NAME.cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning:   ".dimmed());
    println!("{}", patterns.join(" "));
    print!("  {}", "Thresholds: ".dimmed());
    let thresholds: Vec<String> = Metric::ALL
        .iter()
        .map(|m| {
            let th = settings.get(*m);
            format!("{} {}/{}", m, th.warn_at, th.fail_at)
        })
        .collect();
    println!("{}", thresholds.join("  "));
    println!();

    if !result.violations.is_empty() {
        write_violations(&result.violations);
        println!();
    }

    write_final_status(result);
    println!();
}

fn write_violations(violations: &[Violation]) {
    println!("  {} ({}):", "Violations".bold(), violations.len());
    println!();

    for v in violations {
        write_severity_tag(v.severity);
        print!("   ");
        print!("{:<12}", v.rule.as_str().dimmed());
        print!("{}", v.file.blue());
        print!("{}", format!(":{}:{}", v.line, v.column).dimmed());
        println!();

        // Message on next line, indented
        println!("            {}", v.message);
        println!();
    }
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
    }
}

fn write_final_status(result: &DetectionResult) {
    print!(
        "  {}",
        format!(
            "{} files, {} functions",
            result.scanned, result.functions
        )
        .dimmed()
    );
    print!(
        "  {} errors, {} warnings  ",
        result.error_count(),
        result.warning_count()
    );

    if result.has_errors() {
        print!("{}", "FAILED".red());
    } else {
        print!("{}", "PASSED".green());
    }
    println!();
}
