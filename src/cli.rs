//! Command-line interface for go-complexity-lint.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use tracing::debug;

use crate::analysis::{AnalysisContext, LoadOptions};
use crate::config::{self, Config, PartialThresholds};
use crate::detect::Runner;
use crate::metrics::{Engine, Metric};
use crate::report::{self, Format};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;

/// Complexity linter for Go.
///
/// Reports functions whose nesting depth, cyclomatic complexity, parameter
/// count or fan-out exceed the configured thresholds. Values above `warn`
/// are warnings, values above `fail` are errors and fail the run.
#[derive(Parser, Debug)]
#[command(name = "go-complexity-lint")]
#[command(author, version, about, long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Packages to check: `./...`, a directory, or a file
    pub patterns: Vec<String>,

    /// Nesting depth warning threshold
    #[arg(long = "nestdepth.warn", value_name = "N")]
    pub nestdepth_warn: Option<i64>,

    /// Nesting depth error threshold
    #[arg(long = "nestdepth.fail", value_name = "N")]
    pub nestdepth_fail: Option<i64>,

    /// Cyclomatic complexity warning threshold
    #[arg(long = "cyclo.warn", value_name = "N")]
    pub cyclo_warn: Option<i64>,

    /// Cyclomatic complexity error threshold
    #[arg(long = "cyclo.fail", value_name = "N")]
    pub cyclo_fail: Option<i64>,

    /// Parameter count warning threshold
    #[arg(long = "params.warn", value_name = "N")]
    pub params_warn: Option<i64>,

    /// Parameter count error threshold
    #[arg(long = "params.fail", value_name = "N")]
    pub params_fail: Option<i64>,

    /// Fan-out warning threshold
    #[arg(long = "fanout.warn", value_name = "N")]
    pub fanout_warn: Option<i64>,

    /// Fan-out error threshold
    #[arg(long = "fanout.fail", value_name = "N")]
    pub fanout_fail: Option<i64>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: Format,

    /// Also analyze _test.go files
    #[arg(long)]
    pub tests: bool,

    /// Log progress at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Threshold bounds given on the command line, by metric.
    pub fn threshold_flags(&self) -> BTreeMap<Metric, PartialThresholds> {
        let flags = [
            (Metric::NestDepth, self.nestdepth_warn, self.nestdepth_fail),
            (Metric::Cyclo, self.cyclo_warn, self.cyclo_fail),
            (Metric::Params, self.params_warn, self.params_fail),
            (Metric::FanOut, self.fanout_warn, self.fanout_fail),
        ];
        flags
            .into_iter()
            .map(|(metric, warn, fail)| (metric, PartialThresholds { warn, fail }))
            .filter(|(_, partial)| !partial.is_empty())
            .collect()
    }
}

/// Run the linter; returns the process exit code.
pub fn run_lint(cli: &Cli) -> anyhow::Result<i32> {
    if cli.patterns.is_empty() {
        eprintln!("{}", Cli::command().render_usage());
        return Ok(EXIT_FAILED);
    }

    let cwd = std::env::current_dir()?;

    // Configuration is validated before anything is loaded.
    let config = Config::load(cli.config.as_deref(), &cwd)?;
    let settings = config::resolve_settings(&config, &cli.threshold_flags())?;
    let engine = Engine::new(settings)?;
    debug!(?settings, "effective thresholds");

    let options = LoadOptions {
        include_tests: cli.tests || config.should_include_test_files(),
        excluded: config.excluded_globs()?,
    };
    let ctx = AnalysisContext::with_options(&cwd, options);
    let packages = ctx.load(&cli.patterns)?;

    let runner = Runner::new(engine);
    let result = runner.run(&packages);

    match cli.format {
        Format::Text => report::write_text(&result)?,
        Format::Pretty => report::write_pretty(&cli.patterns, runner.engine().settings(), &result),
        Format::Json => report::write_json(&cli.patterns, runner.engine().settings(), &result)?,
        Format::Sarif => report::write_sarif(&result)?,
    }

    if result.has_errors() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}
