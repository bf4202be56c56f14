//! Per-function threshold overrides from doc comment directives.
//!
//! ```go
//! //complexity:nestdepth:warn=8,fail=10
//! func legacyParser() { ... }
//! ```

use tracing::debug;

use super::Thresholds;

/// Every directive starts with this prefix, followed by `<metric>:`.
pub const DIRECTIVE_PREFIX: &str = "//complexity:";

/// Thresholds for `metric` after applying the first matching directive in `doc`.
///
/// Unknown keys and values that are not integers are skipped, leaving the
/// default for that key. The result is returned as-is: an override with
/// `warn > fail` is not rejected here.
pub fn resolve(doc: &[String], metric: &str, defaults: Thresholds) -> Thresholds {
    let prefix = format!("{}{}:", DIRECTIVE_PREFIX, metric);

    let Some(directive) = doc
        .iter()
        .map(|line| line.trim())
        .find_map(|line| line.strip_prefix(prefix.as_str()))
    else {
        return defaults;
    };

    let mut result = defaults;
    for part in directive.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        let Ok(value) = value.trim().parse::<i64>() else {
            debug!(metric, part, "ignoring malformed override value");
            continue;
        };
        match key.trim() {
            "warn" => result.warn_at = value,
            "fail" => result.fail_at = value,
            _ => {}
        }
    }
    result
}
