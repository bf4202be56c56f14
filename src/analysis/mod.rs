//! Go source loading and analysis.
//!
//! This module turns command-line patterns into lowered Go packages the
//! metrics engine can consume:
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Patterns        │────▶│ GoFrontend   │────▶│ SourceFile    │
//! │ (./..., dir, f) │     │ (tree-sitter)│     │ (syntax model)│
//! └─────────────────┘     └──────────────┘     └───────────────┘
//!                                                      │
//!                                                      ▼
//!                         ┌──────────────┐     ┌───────────────┐
//!                         │ GoResolver   │◀────│ PackageScope  │
//!                         │ (fan-out)    │     │ (per package) │
//!                         └──────────────┘     └───────────────┘
//! ```

mod context;
mod go;
mod parsed;
mod resolve;

pub use context::{AnalysisContext, LoadError, LoadOptions, Package};
pub use go::GoFrontend;
pub use parsed::ParsedFile;
pub use resolve::{FunctionResolver, GoResolver, PackageScope, SymbolId};
