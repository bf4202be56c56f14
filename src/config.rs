//! Configuration file schema and threshold layering.
//!
//! Settings are layered: built-in defaults, then the YAML config file, then
//! command-line flags. Each layer overrides only the keys it sets.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::metrics::{Metric, MetricSettings, Thresholds};

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &[".complexity-lint.yaml", "complexity-lint.yaml"];

/// Errors raised before any analysis starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {metric} thresholds: {reason}")]
    InvalidThreshold { metric: String, reason: String },
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid excluded_paths pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Threshold keys a layer may set for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PartialThresholds {
    #[serde(default)]
    pub warn: Option<i64>,
    #[serde(default)]
    pub fail: Option<i64>,
}

impl PartialThresholds {
    pub fn is_empty(&self) -> bool {
        self.warn.is_none() && self.fail.is_none()
    }

    /// Overwrite the bounds present in this layer.
    pub fn apply_to(&self, thresholds: &mut Thresholds) {
        if let Some(warn) = self.warn {
            thresholds.warn_at = warn;
        }
        if let Some(fail) = self.fail {
            thresholds.fail_at = fail;
        }
    }
}

/// Top-level config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Per-metric threshold overrides, keyed by metric name.
    #[serde(default)]
    pub thresholds: BTreeMap<Metric, PartialThresholds>,
    /// Whether to analyze `_test.go` files (default: false)
    #[serde(default)]
    pub include_test_files: Option<bool>,
    /// Glob patterns for paths to exclude, relative to the working directory
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to YAML null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load the explicit config file, or the first default name found in `dir`.
    ///
    /// No file at all yields the empty config.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config(dir),
        };
        match path {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Self::parse_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Returns whether to include test files (defaults to false).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(false)
    }

    /// Layer this config's thresholds over `settings`.
    pub fn apply(&self, settings: &mut MetricSettings) {
        for (metric, partial) in &self.thresholds {
            partial.apply_to(settings.get_mut(*metric));
        }
    }

    /// Compile `excluded_paths` into one matcher; `None` when there are none.
    pub fn excluded_globs(&self) -> Result<Option<GlobSet>, ConfigError> {
        if self.excluded_paths.is_empty() {
            return Ok(None);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| ConfigError::InvalidGlob {
            pattern: self.excluded_paths.join(", "),
            source,
        })?;
        Ok(Some(set))
    }
}

/// Find a config file in `dir` by its default names.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Settings for a run: defaults, then `config`, then `flags`, validated.
pub fn resolve_settings(
    config: &Config,
    flags: &BTreeMap<Metric, PartialThresholds>,
) -> Result<MetricSettings, ConfigError> {
    let mut settings = MetricSettings::default();
    config.apply(&mut settings);
    for (metric, partial) in flags {
        partial.apply_to(settings.get_mut(*metric));
    }
    settings.validate()?;
    Ok(settings)
}
