//! Detection: runs the metrics engine over loaded packages.

mod runner;
mod types;

pub use runner::Runner;
pub use types::{DetectionResult, Severity, Violation};
