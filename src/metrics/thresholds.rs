//! Warn/fail boundaries and zone classification.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::detect::Severity;

/// Zone a metric value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Within acceptable limits.
    Green,
    /// Above `warn_at`, reported as a warning.
    Yellow,
    /// Above `fail_at`, reported as an error.
    Red,
}

impl Zone {
    /// Severity of the diagnostic emitted for this zone, `None` for green.
    pub fn severity(self) -> Option<Severity> {
        match self {
            Zone::Green => None,
            Zone::Yellow => Some(Severity::Warning),
            Zone::Red => Some(Severity::Error),
        }
    }

    /// Category tag used in diagnostic messages; empty for green.
    pub fn category(self) -> &'static str {
        match self {
            Zone::Green => "",
            Zone::Yellow => "warning",
            Zone::Red => "error",
        }
    }
}

/// Boundaries for one metric.
///
/// Values up to and including `warn_at` are green, values up to and including
/// `fail_at` are yellow, anything above is red. Bounds are signed so that a
/// negative value from the command line survives until [`Thresholds::validate`]
/// can reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(rename = "warn")]
    pub warn_at: i64,
    #[serde(rename = "fail")]
    pub fail_at: i64,
}

impl Thresholds {
    pub const fn new(warn_at: i64, fail_at: i64) -> Self {
        Self { warn_at, fail_at }
    }

    pub fn classify(&self, value: usize) -> Zone {
        let value = i64::try_from(value).unwrap_or(i64::MAX);
        if value <= self.warn_at {
            Zone::Green
        } else if value <= self.fail_at {
            Zone::Yellow
        } else {
            Zone::Red
        }
    }

    /// Check the bounds are non-negative and ordered.
    ///
    /// `metric` names the owner in the error (e.g. `nestdepth`).
    pub fn validate(&self, metric: &str) -> Result<(), ConfigError> {
        if self.warn_at < 0 {
            return Err(ConfigError::InvalidThreshold {
                metric: metric.to_string(),
                reason: format!("warn must be non-negative, got {}", self.warn_at),
            });
        }
        if self.fail_at < 0 {
            return Err(ConfigError::InvalidThreshold {
                metric: metric.to_string(),
                reason: format!("fail must be non-negative, got {}", self.fail_at),
            });
        }
        if self.warn_at > self.fail_at {
            return Err(ConfigError::InvalidThreshold {
                metric: metric.to_string(),
                reason: format!(
                    "warn ({}) must not exceed fail ({})",
                    self.warn_at, self.fail_at
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let th = Thresholds::new(4, 6);
        assert_eq!(th.classify(0), Zone::Green);
        assert_eq!(th.classify(4), Zone::Green);
        assert_eq!(th.classify(5), Zone::Yellow);
        assert_eq!(th.classify(6), Zone::Yellow);
        assert_eq!(th.classify(7), Zone::Red);
        assert_eq!(th.classify(100), Zone::Red);
    }

    #[test]
    fn test_classify_boundaries() {
        for (w, f) in [(0, 0), (0, 3), (4, 6), (5, 5), (9, 14)] {
            let th = Thresholds::new(w, f);
            let w = w as usize;
            let f = f as usize;
            assert_eq!(th.classify(w), Zone::Green);
            let next = if w < f { Zone::Yellow } else { Zone::Red };
            assert_eq!(th.classify(w + 1), next);
            assert_ne!(th.classify(f), Zone::Red);
            assert_eq!(th.classify(f + 1), Zone::Red);
        }
    }

    #[test]
    fn test_validate() {
        assert!(Thresholds::new(4, 6).validate("test").is_ok());
        assert!(Thresholds::new(5, 5).validate("test").is_ok());
        assert!(Thresholds::new(0, 0).validate("test").is_ok());

        assert!(Thresholds::new(-1, 6).validate("test").is_err());
        assert!(Thresholds::new(4, -1).validate("test").is_err());
        assert!(Thresholds::new(10, 5).validate("test").is_err());
    }

    #[test]
    fn test_validate_names_offending_bound() {
        let err = Thresholds::new(-1, 6).validate("cyclo").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("cyclo"));
        assert!(msg.contains("warn"));

        let err = Thresholds::new(4, -2).validate("params").unwrap_err();
        assert!(err.to_string().contains("fail"));

        let err = Thresholds::new(10, 5).validate("fanout").unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
    }

    #[test]
    fn test_zone_category() {
        assert_eq!(Zone::Green.category(), "");
        assert_eq!(Zone::Yellow.category(), "warning");
        assert_eq!(Zone::Red.category(), "error");
        assert_eq!(Zone::Green.severity(), None);
        assert_eq!(Zone::Red.severity(), Some(Severity::Error));
    }
}
