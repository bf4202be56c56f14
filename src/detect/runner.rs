//! Detection runner that measures every function of the loaded packages.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::analysis::{GoResolver, Package, PackageScope};
use crate::metrics::Engine;
use crate::syntax::SourceFile;

use super::{DetectionResult, Violation};

/// Executes the metrics engine against a set of packages.
pub struct Runner {
    engine: Engine,
}

impl Runner {
    /// Create a new detection runner.
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Measure every function in `packages`.
    ///
    /// Files are analyzed in parallel; violations come back sorted by file,
    /// line, column and metric.
    pub fn run(&self, packages: &[Package]) -> DetectionResult {
        let scopes: Vec<PackageScope> = packages
            .iter()
            .map(|pkg| PackageScope::from_files(pkg.path.clone(), &pkg.files))
            .collect();

        let units: Vec<(&PackageScope, &SourceFile)> = packages
            .iter()
            .zip(&scopes)
            .flat_map(|(pkg, scope)| pkg.files.iter().map(move |file| (scope, file)))
            .collect();

        let mut result = units
            .par_iter()
            .map(|(scope, file)| self.analyze_file(scope, file))
            .reduce(DetectionResult::new, |mut acc, r| {
                acc.merge(r);
                acc
            });
        result.sort();

        info!(
            packages = packages.len(),
            files = result.scanned,
            functions = result.functions,
            errors = result.error_count(),
            warnings = result.warning_count(),
            "analysis complete"
        );
        result
    }

    fn analyze_file(&self, scope: &PackageScope, file: &SourceFile) -> DetectionResult {
        let resolver = GoResolver::new(scope, file);
        let mut result = DetectionResult::new();
        result.scanned = 1;

        for func in file.functions.iter().filter(|f| f.body.is_some()) {
            result.functions += 1;
            for finding in self.engine.analyze_function(func, &resolver.in_function(func)) {
                result.add_violation(Violation::from_finding(&file.path, finding));
            }
        }

        debug!(
            path = %file.path,
            functions = result.functions,
            violations = result.violations.len(),
            "analyzed file"
        );
        result
    }
}
