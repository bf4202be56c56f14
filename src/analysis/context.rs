//! Loading Go packages from command-line patterns.
//!
//! The AnalysisContext provides:
//! - Pattern expansion (`./...`, directories, single files)
//! - Parallel parsing and lowering of every matched file
//! - Grouping of files into packages with their import paths

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::analysis::GoFrontend;
use crate::syntax::{Position, SourceFile};

lazy_static! {
    static ref MODULE_DIRECTIVE: Regex =
        Regex::new(r#"(?m)^\s*module\s+"?([^\s"]+)"?"#).unwrap();
}

/// Errors that abort loading; no package is analyzed if any occurs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}: no such file or directory")]
    NotFound(String),
    #[error("{path}:{position}: syntax error")]
    Syntax { path: String, position: Position },
    #[error("{path}: {message}")]
    Parse { path: String, message: String },
}

/// Which files a load considers.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Include `_test.go` files.
    pub include_tests: bool,
    /// Paths (relative to the base directory) to skip.
    pub excluded: Option<GlobSet>,
}

/// Files sharing a directory and package clause.
#[derive(Debug, Clone)]
pub struct Package {
    pub dir: PathBuf,
    /// Package name from the package clause.
    pub name: String,
    /// Import path, used to tell standard library calls apart.
    pub path: String,
    pub files: Vec<SourceFile>,
}

/// Analysis context for one run.
pub struct AnalysisContext {
    /// Base directory for relative path resolution.
    base_dir: PathBuf,
    options: LoadOptions,
    frontend: GoFrontend,
}

impl AnalysisContext {
    /// Create a new analysis context.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self::with_options(base_dir, LoadOptions::default())
    }

    pub fn with_options<P: AsRef<Path>>(base_dir: P, options: LoadOptions) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            options,
            frontend: GoFrontend::new(),
        }
    }

    /// Get the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load every package matched by `patterns`.
    ///
    /// Fails on the first unreadable path or file with syntax errors.
    /// Packages are returned sorted by directory and name.
    pub fn load(&self, patterns: &[String]) -> Result<Vec<Package>, LoadError> {
        let mut paths = Vec::new();
        for pattern in patterns {
            let matched = self.expand_pattern(pattern)?;
            if matched.is_empty() {
                warn!(pattern = %pattern, "pattern matched no Go files");
            }
            paths.extend(matched);
        }
        paths.sort();
        paths.dedup();

        let files: Vec<SourceFile> = paths
            .par_iter()
            .map(|p| self.load_file(p))
            .collect::<Result<_, _>>()?;

        let mut grouped: BTreeMap<(PathBuf, String), Vec<SourceFile>> = BTreeMap::new();
        for (path, file) in paths.iter().zip(files) {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            grouped
                .entry((dir, file.package.clone()))
                .or_default()
                .push(file);
        }

        let packages: Vec<Package> = grouped
            .into_iter()
            .map(|((dir, name), files)| {
                let path = self.import_path(&dir);
                debug!(package = %path, files = files.len(), "loaded package");
                Package {
                    dir,
                    name,
                    path,
                    files,
                }
            })
            .collect();

        Ok(packages)
    }

    /// Expand one pattern into the Go files it names.
    fn expand_pattern(&self, pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
        let (root, recursive) = match pattern.strip_suffix("...") {
            Some(prefix) => {
                let prefix = prefix.trim_end_matches('/');
                (if prefix.is_empty() { "." } else { prefix }, true)
            }
            None => (pattern, false),
        };
        let root_path = self.resolve(root);

        if root_path.is_file() {
            return Ok(vec![root_path]);
        }
        if !root_path.is_dir() {
            return Err(LoadError::NotFound(pattern.to_string()));
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        let walker = WalkDir::new(&root_path)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !is_ignored_name(&e.file_name().to_string_lossy(), e.file_type().is_dir())
            });

        for entry in walker {
            let entry = entry.map_err(|e| LoadError::Io {
                path: root_path.display().to_string(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_go_source(path) {
                continue;
            }
            if self.is_excluded(path) {
                debug!(path = %path.display(), "excluded by configuration");
                continue;
            }
            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    fn is_go_source(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(".go") && (self.options.include_tests || !name.ends_with("_test.go"))
    }

    fn is_excluded(&self, path: &Path) -> bool {
        match &self.options.excluded {
            Some(set) => set.is_match(self.relative(path)),
            None => false,
        }
    }

    /// Read, parse and lower one file.
    fn load_file(&self, path: &Path) -> Result<SourceFile, LoadError> {
        let rel_path = self.relative(path).to_string_lossy().to_string();
        let source = fs::read(path).map_err(|source| LoadError::Io {
            path: rel_path.clone(),
            source,
        })?;

        let parsed = self
            .frontend
            .parse(Path::new(&rel_path), &source)
            .map_err(|e| LoadError::Parse {
                path: rel_path.clone(),
                message: e.to_string(),
            })?;
        if let Some(position) = parsed.first_syntax_error() {
            return Err(LoadError::Syntax {
                path: rel_path,
                position,
            });
        }

        debug!(path = %rel_path, "parsed");
        self.frontend.lower(&parsed).map_err(|e| LoadError::Parse {
            path: rel_path,
            message: e.to_string(),
        })
    }

    /// Import path of the package in `dir`.
    ///
    /// The nearest `go.mod` module path joined with the directory relative to
    /// the module root; without a module, the directory name.
    pub fn import_path(&self, dir: &Path) -> String {
        let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());

        for ancestor in dir.ancestors() {
            let Ok(content) = fs::read_to_string(ancestor.join("go.mod")) else {
                continue;
            };
            let Some(module) = MODULE_DIRECTIVE
                .captures(&content)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
            else {
                continue;
            };
            let rel = dir.strip_prefix(ancestor).unwrap_or(Path::new(""));
            let segments: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect();
            return if segments.is_empty() {
                module
            } else {
                format!("{}/{}", module, segments.join("/"))
            };
        }

        dir.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "main".to_string())
    }

    fn resolve(&self, path: &str) -> PathBuf {
        // Collecting components drops interior `.` segments.
        self.base_dir.join(path).components().collect()
    }

    /// `path` relative to the base directory, for display and exclusion.
    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        let rel = path.strip_prefix(&self.base_dir).unwrap_or(path);
        rel.strip_prefix(".").unwrap_or(rel)
    }
}

/// Directories the go tool skips when expanding `...`, and files it ignores.
fn is_ignored_name(name: &str, is_dir: bool) -> bool {
    if name.starts_with('.') || name.starts_with('_') {
        return true;
    }
    is_dir && (name == "testdata" || name == "vendor")
}
