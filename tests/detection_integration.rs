//! End-to-end detection over the Go fixtures in `testdata/`.

use std::path::PathBuf;

use go_complexity_lint::analysis::AnalysisContext;
use go_complexity_lint::detect::{DetectionResult, Runner, Severity};
use go_complexity_lint::metrics::{Engine, Metric, MetricSettings};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn run(patterns: &[&str], settings: MetricSettings) -> DetectionResult {
    let ctx = AnalysisContext::new(testdata_path());
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
    let packages = ctx.load(&patterns).expect("fixtures should load");
    let engine = Engine::new(settings).expect("settings should be valid");
    Runner::new(engine).run(&packages)
}

/// `(file, line, message)` for every violation, in report order.
fn diagnostics(result: &DetectionResult) -> Vec<(String, usize, String)> {
    result
        .violations
        .iter()
        .map(|v| (v.file.clone(), v.line, v.message.clone()))
        .collect()
}

fn expect(file: &str, line: usize, message: &str) -> (String, usize, String) {
    (file.to_string(), line, message.to_string())
}

#[test]
fn test_nestdepth_fixtures() {
    let result = run(&["nestdepth"], MetricSettings::default());
    assert_eq!(
        diagnostics(&result),
        vec![
            expect(
                "nestdepth/basic.go",
                40,
                "function DepthFive has a nesting depth of 5 (warn: >4, fail: >6) [warning]"
            ),
            expect(
                "nestdepth/basic.go",
                57,
                "function DepthSeven has a nesting depth of 7 (warn: >4, fail: >6) [error]"
            ),
            expect(
                "nestdepth/complex.go",
                18,
                "function *MyStruct.DeepMethod has a nesting depth of 6 (warn: >4, fail: >6) [warning]"
            ),
            expect(
                "nestdepth/complex.go",
                34,
                "function ClosureNesting has a nesting depth of 6 (warn: >4, fail: >6) [warning]"
            ),
            expect(
                "nestdepth/complex.go",
                65,
                "function RangeLoop has a nesting depth of 6 (warn: >4, fail: >6) [warning]"
            ),
            expect(
                "nestdepth/complex.go",
                104,
                "function GoRoutineClosure has a nesting depth of 7 (warn: >4, fail: >6) [error]"
            ),
            expect(
                "nestdepth/complex.go",
                134,
                "function LabeledLoop has a nesting depth of 5 (warn: >4, fail: >6) [warning]"
            ),
            expect(
                "nestdepth/complex.go",
                153,
                "function BareBlock has a nesting depth of 5 (warn: >4, fail: >6) [warning]"
            ),
        ]
    );
    assert_eq!(result.error_count(), 2);
    assert!(result.has_errors());
}

#[test]
fn test_nestdepth_override_is_silent() {
    let result = run(&["nestdepth/override.go"], MetricSettings::default());
    assert_eq!(result.scanned, 1);
    assert_eq!(result.functions, 1);
    assert!(result.violations.is_empty());
}

#[test]
fn test_cyclo_fixtures() {
    let result = run(&["cyclo"], MetricSettings::default());
    assert_eq!(
        diagnostics(&result),
        vec![
            expect(
                "cyclo/basic.go",
                52,
                "function ComplexFunc has cyclomatic complexity of 10 (warn: >9, fail: >14) [warning]"
            ),
            expect(
                "cyclo/basic.go",
                138,
                "function FuncLitComplexity has cyclomatic complexity of 10 (warn: >9, fail: >14) [warning]"
            ),
            expect(
                "cyclo/basic.go",
                169,
                "function GoFuncComplexity has cyclomatic complexity of 10 (warn: >9, fail: >14) [warning]"
            ),
        ]
    );
    assert!(!result.has_errors());
}

#[test]
fn test_params_fixtures() {
    let result = run(&["params"], MetricSettings::default());
    assert_eq!(
        diagnostics(&result),
        vec![
            expect(
                "params/basic.go",
                12,
                "function FiveParams has 5 parameters (warn: >4, fail: >6) [warning]"
            ),
            expect(
                "params/basic.go",
                17,
                "function SevenParams has 7 parameters (warn: >4, fail: >6) [error]"
            ),
            expect(
                "params/basic.go",
                22,
                "function GroupedParams has 5 parameters (warn: >4, fail: >6) [warning]"
            ),
            expect(
                "params/basic.go",
                40,
                "function UnnamedParams has 5 parameters (warn: >4, fail: >6) [warning]"
            ),
            expect(
                "params/basic.go",
                44,
                "function MixedNamedUnnamed has 5 parameters (warn: >4, fail: >6) [warning]"
            ),
        ]
    );
    // Every params diagnostic sits on the `func` keyword.
    assert!(result.violations.iter().all(|v| v.column == 1));
}

#[test]
fn test_fanout_fixtures() {
    let result = run(&["fanout"], MetricSettings::default());
    assert_eq!(
        diagnostics(&result),
        vec![
            expect(
                "fanout/busy.go",
                11,
                "function Busy has fan out of 7 (warn: >6, fail: >9) [warning]"
            ),
            expect(
                "fanout/busy.go",
                24,
                "function Tangled has fan out of 10 (warn: >6, fail: >9) [error]"
            ),
        ]
    );
}

#[test]
fn test_whole_module() {
    let result = run(&["./..."], MetricSettings::default());
    assert_eq!(result.scanned, 7);
    assert_eq!(result.violations.len(), 8 + 3 + 5 + 2);

    let files: Vec<&str> = result.violations.iter().map(|v| v.file.as_str()).collect();
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);

    let errors: Vec<(Metric, &str)> = result
        .violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .map(|v| (v.rule, v.function.as_str()))
        .collect();
    assert_eq!(
        errors,
        vec![
            (Metric::FanOut, "Tangled"),
            (Metric::NestDepth, "DepthSeven"),
            (Metric::NestDepth, "GoRoutineClosure"),
            (Metric::Params, "SevenParams"),
        ]
    );
}

#[test]
fn test_custom_thresholds() {
    let mut settings = MetricSettings::default();
    settings.nestdepth.warn_at = 5;
    settings.nestdepth.fail_at = 5;
    let result = run(&["nestdepth/basic.go"], settings);

    // DepthFive is now green, DepthSeven still red.
    assert_eq!(
        diagnostics(&result),
        vec![expect(
            "nestdepth/basic.go",
            57,
            "function DepthSeven has a nesting depth of 7 (warn: >5, fail: >5) [error]"
        )]
    );
}

#[test]
fn test_zero_thresholds_flag_everything_measurable() {
    let mut settings = MetricSettings::default();
    settings.params.warn_at = 0;
    settings.params.fail_at = 0;
    let result = run(&["params/basic.go"], settings);

    // NoParams is the only function with zero parameters.
    let flagged: Vec<&str> = result.violations.iter().map(|v| v.function.as_str()).collect();
    assert_eq!(
        flagged,
        vec![
            "FourParams",
            "FiveParams",
            "SevenParams",
            "GroupedParams",
            "*MyStruct.MethodWithFourParams",
            "Variadic",
            "UnnamedParams",
            "MixedNamedUnnamed",
        ]
    );
}
