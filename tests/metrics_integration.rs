//! Raw metric values for every fixture function, green ones included.

use std::collections::HashMap;
use std::path::PathBuf;

use go_complexity_lint::analysis::{AnalysisContext, GoResolver, Package, PackageScope};
use go_complexity_lint::metrics::{Engine, Metric, MetricSettings};

fn load(pattern: &str) -> Package {
    let ctx = AnalysisContext::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata"));
    let mut packages = ctx
        .load(&[pattern.to_string()])
        .expect("fixtures should load");
    assert_eq!(packages.len(), 1);
    packages.remove(0)
}

/// Display name to metric value for every function with a body.
fn measure(pattern: &str, metric: Metric) -> HashMap<String, usize> {
    measure_package(&load(pattern), metric)
}

fn measure_package(package: &Package, metric: Metric) -> HashMap<String, usize> {
    let scope = PackageScope::from_files(package.path.clone(), &package.files);
    let engine = Engine::new(MetricSettings::default()).unwrap();

    let mut values = HashMap::new();
    for file in &package.files {
        let resolver = GoResolver::new(&scope, file);
        for func in &file.functions {
            if let Some((value, _)) = engine.measure(metric, func, &resolver.in_function(func)) {
                values.insert(func.display_name(), value);
            }
        }
    }
    values
}

fn assert_values(values: &HashMap<String, usize>, expected: &[(&str, usize)]) {
    for (name, value) in expected {
        assert_eq!(values.get(*name), Some(value), "{}", name);
    }
}

#[test]
fn test_nesting_depth_values() {
    let values = measure("nestdepth", Metric::NestDepth);
    assert_values(
        &values,
        &[
            ("Flat", 0),
            ("Empty", 0),
            ("DepthOne", 1),
            ("DepthFour", 4),
            ("DepthFive", 5),
            ("DepthSeven", 7),
            ("*MyStruct.DeepMethod", 6),
            ("ClosureNesting", 6),
            ("ElseIfChain", 1),
            ("RangeLoop", 6),
            ("TypeSwitchNesting", 3),
            ("DeferClosure", 2),
            ("GoRoutineClosure", 7),
            ("ErrGuardExempt", 1),
            ("LabeledLoop", 5),
            ("BareBlock", 5),
            ("OverriddenDeep", 7),
            ("doSomething", 0),
        ],
    );
}

#[test]
fn test_cyclomatic_complexity_values() {
    let values = measure("cyclo", Metric::Cyclo);
    assert_values(
        &values,
        &[
            ("Simple", 1),
            ("SingleIf", 2),
            ("ForLoop", 2),
            ("ElseIfChain", 3),
            ("SwitchCases", 4),
            ("ComplexFunc", 10),
            ("ErrGuardExempt", 2),
            ("ErrGuardNonExempt", 2),
            ("SelectCases", 3),
            ("RangeLoop", 2),
            ("NestedIf", 4),
            ("FuncLitComplexity", 10),
            ("GoFuncComplexity", 10),
            ("log", 1),
        ],
    );
}

#[test]
fn test_parameter_count_values() {
    let values = measure("params", Metric::Params);
    assert_values(
        &values,
        &[
            ("NoParams", 0),
            ("FourParams", 4),
            ("FiveParams", 5),
            ("SevenParams", 7),
            ("GroupedParams", 5),
            ("*MyStruct.MethodWithFourParams", 4),
            ("Variadic", 2),
            ("UnnamedParams", 5),
            ("MixedNamedUnnamed", 5),
        ],
    );
}

#[test]
fn test_fan_out_values() {
    let values = measure("fanout", Metric::FanOut);
    assert_values(
        &values,
        &[
            ("NoCalls", 0),
            ("BuiltinsOnly", 0),
            ("TypeConversion", 0),
            // The fixture module path has a dot, so local calls count.
            ("StdlibOnly", 1),
            ("RepeatedCall", 1),
            ("Busy", 7),
            ("Tangled", 10),
            ("Raised", 10),
            ("helper", 0),
        ],
    );
}

#[test]
fn test_fan_out_follows_receiver_types() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("go.mod"), "module example.com/app\n").unwrap();
    std::fs::write(
        tmp.path().join("app.go"),
        r#"package app

import (
	"bytes"
	"strings"

	"example.com/app/client"
)

type Buffer struct{}

func (b *Buffer) String() string { return "" }
func (b *Buffer) Reset()         {}

type Pool struct{}

func (p *Pool) Reset() {}

func Render(buf *bytes.Buffer) string {
	var sb strings.Builder
	sb.WriteString(buf.String())
	buf.Reset()
	return sb.String()
}

func ResetAll(b *Buffer, p *Pool) {
	b.Reset()
	p.Reset()
	b.Reset()
}

func Remote(c *client.Conn, retry func() error) error {
	c.Send()
	c.Close()
	if err := retry(); err != nil {
		return err
	}
	return retry()
}
"#,
    )
    .unwrap();

    let mut packages = AnalysisContext::new(tmp.path())
        .load(&["./...".to_string()])
        .unwrap();
    let values = measure_package(&packages.remove(0), Metric::FanOut);

    // Standard library receivers never count, even when a local type
    // declares a method with the same name.
    assert_eq!(values["Render"], 0);
    assert_eq!(values["ResetAll"], 2);
    // Conn.Send, Conn.Close and the retry parameter.
    assert_eq!(values["Remote"], 3);
}

#[test]
fn test_package_import_paths() {
    assert_eq!(load("nestdepth").path, "example.com/demo/nestdepth");
    assert_eq!(load("params/basic.go").name, "params");
}
