//! Per-function complexity metrics.
//!
//! Four independent analyzers, each producing one number per function:
//!
//! | metric      | measures                                   | reported at          |
//! |-------------|--------------------------------------------|----------------------|
//! | `nestdepth` | deepest control-flow nesting               | the deepest point    |
//! | `cyclo`     | cyclomatic complexity                      | the `func` keyword   |
//! | `params`    | number of formal parameters                | the `func` keyword   |
//! | `fanout`    | distinct non-stdlib functions called       | the `func` keyword   |
//!
//! The [`Engine`] applies per-function overrides, classifies each value and
//! turns every non-green result into a [`Finding`].

pub mod cyclo;
pub mod errguard;
pub mod fanout;
pub mod nestdepth;
pub mod overrides;
pub mod params;
mod thresholds;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use errguard::is_error_guard;
pub use fanout::{Callee, SymbolResolver};
pub use nestdepth::Deepest;
pub use thresholds::{Thresholds, Zone};

use crate::config::ConfigError;
use crate::detect::Severity;
use crate::syntax::{FunctionDecl, Position};

/// The metrics the engine computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "nestdepth")]
    NestDepth,
    #[serde(rename = "cyclo")]
    Cyclo,
    #[serde(rename = "params")]
    Params,
    #[serde(rename = "fanout")]
    FanOut,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::NestDepth, Metric::Cyclo, Metric::Params, Metric::FanOut];

    /// Name used in directives, flags and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::NestDepth => "nestdepth",
            Metric::Cyclo => "cyclo",
            Metric::Params => "params",
            Metric::FanOut => "fanout",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Metric::ALL.into_iter().find(|m| m.as_str() == s)
    }

    pub fn default_thresholds(&self) -> Thresholds {
        match self {
            Metric::NestDepth => Thresholds::new(4, 6),
            Metric::Cyclo => Thresholds::new(9, 14),
            Metric::Params => Thresholds::new(4, 6),
            Metric::FanOut => Thresholds::new(6, 9),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Metric::NestDepth => {
                "Reports functions with excessive nesting depth. Depth grows with \
                 if/else, for/range, switch, select, case clauses and function \
                 literals. Error guard clauses are exempt."
            }
            Metric::Cyclo => {
                "Reports functions with high cyclomatic complexity: 1 plus one for each \
                 if, for, range and non-default case. Error guard clauses are exempt."
            }
            Metric::Params => {
                "Reports functions with too many parameters, counting grouped \
                 parameters such as func(a, b int) individually."
            }
            Metric::FanOut => {
                "Reports functions calling too many distinct functions. Builtins, type \
                 conversions and standard library calls are excluded."
            }
        }
    }

    fn message(&self, function: &str, value: usize, thresholds: Thresholds, zone: Zone) -> String {
        let measured = match self {
            Metric::NestDepth => format!("a nesting depth of {}", value),
            Metric::Cyclo => format!("cyclomatic complexity of {}", value),
            Metric::Params => format!("{} parameters", value),
            Metric::FanOut => format!("fan out of {}", value),
        };
        format!(
            "function {} has {} (warn: >{}, fail: >{}) [{}]",
            function,
            measured,
            thresholds.warn_at,
            thresholds.fail_at,
            zone.category()
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Default thresholds for every metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricSettings {
    pub nestdepth: Thresholds,
    pub cyclo: Thresholds,
    pub params: Thresholds,
    pub fanout: Thresholds,
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self {
            nestdepth: Metric::NestDepth.default_thresholds(),
            cyclo: Metric::Cyclo.default_thresholds(),
            params: Metric::Params.default_thresholds(),
            fanout: Metric::FanOut.default_thresholds(),
        }
    }
}

impl MetricSettings {
    pub fn get(&self, metric: Metric) -> Thresholds {
        match metric {
            Metric::NestDepth => self.nestdepth,
            Metric::Cyclo => self.cyclo,
            Metric::Params => self.params,
            Metric::FanOut => self.fanout,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut Thresholds {
        match metric {
            Metric::NestDepth => &mut self.nestdepth,
            Metric::Cyclo => &mut self.cyclo,
            Metric::Params => &mut self.params,
            Metric::FanOut => &mut self.fanout,
        }
    }

    /// Validate every metric's thresholds, stopping at the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for metric in Metric::ALL {
            self.get(metric).validate(metric.as_str())?;
        }
        Ok(())
    }
}

/// A metric value outside the green zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub metric: Metric,
    /// Display name (`Recv.Name` for methods).
    pub function: String,
    pub position: Position,
    pub severity: Severity,
    pub value: usize,
    /// Thresholds after overrides.
    pub thresholds: Thresholds,
    pub message: String,
}

/// Computes metrics for functions against validated settings.
///
/// The engine holds no mutable state, so one instance can be shared across
/// threads analyzing different files.
#[derive(Debug, Clone)]
pub struct Engine {
    settings: MetricSettings,
}

impl Engine {
    /// Fails if any threshold is negative or has `warn > fail`.
    pub fn new(settings: MetricSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &MetricSettings {
        &self.settings
    }

    /// Raw value of `metric` for `func` and the position to report it at.
    ///
    /// Returns `None` for declarations without a body.
    pub fn measure<R: SymbolResolver>(
        &self,
        metric: Metric,
        func: &FunctionDecl,
        resolver: &R,
    ) -> Option<(usize, Position)> {
        let body = func.body.as_ref()?;
        let measured = match metric {
            Metric::NestDepth => {
                let deepest = nestdepth::max_depth(body);
                (deepest.depth, deepest.position)
            }
            Metric::Cyclo => (cyclo::complexity(body), func.position),
            Metric::Params => (params::count(&func.params), func.position),
            Metric::FanOut => (fanout::fan_out(body, resolver), func.position),
        };
        Some(measured)
    }

    /// Run every metric on `func` and collect the non-green results.
    pub fn analyze_function<R: SymbolResolver>(&self, func: &FunctionDecl, resolver: &R) -> Vec<Finding> {
        let name = func.display_name();
        let mut findings = Vec::new();

        for metric in Metric::ALL {
            let Some((value, position)) = self.measure(metric, func, resolver) else {
                continue;
            };
            let thresholds = overrides::resolve(&func.doc, metric.as_str(), self.settings.get(metric));
            let zone = thresholds.classify(value);
            trace!(function = %name, %metric, value, ?zone, "measured");

            let Some(severity) = zone.severity() else {
                continue;
            };
            findings.push(Finding {
                metric,
                function: name.clone(),
                position,
                severity,
                value,
                thresholds,
                message: metric.message(&name, value, thresholds, zone),
            });
        }

        findings
    }
}
