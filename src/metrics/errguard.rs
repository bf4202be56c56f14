//! Recognizer for the `if err != nil { return ..., err }` guard clause.
//!
//! Nesting depth and cyclomatic complexity both exempt a guard and its whole
//! subtree, so idiomatic error propagation does not inflate either metric.

use crate::syntax::{Expr, IfStmt, LitKind, Statement};

/// Report whether `stmt` is an error guard.
///
/// All of these must hold:
///  1. the condition is `x != nil` or `nil != x` for an identifier `x`
///  2. there is no else branch
///  3. the then-block holds exactly one statement, a return
///  4. the return has at least one result
///  5. every result but the last is a zero value literal
///  6. the last result is `x` itself or any call
///
/// The check is purely syntactic: the type of `x` is never consulted.
pub fn is_error_guard(stmt: &IfStmt) -> bool {
    let Some(err_name) = ident_not_nil(&stmt.cond) else {
        return false;
    };
    if stmt.else_branch.is_some() {
        return false;
    }
    let [Statement::Return(ret)] = stmt.then.stmts.as_slice() else {
        return false;
    };
    let Some((last, rest)) = ret.results.split_last() else {
        return false;
    };

    let last_ok = match last {
        Expr::Ident(name) => name == err_name,
        // fmt.Errorf, errors.New, wrap(err)...
        Expr::Call { .. } => true,
        _ => false,
    };

    last_ok && rest.iter().all(is_zero_value)
}

/// Name of the identifier compared against `nil`, if the condition has that shape.
fn ident_not_nil(cond: &Expr) -> Option<&str> {
    let Expr::Binary { op, x, y } = cond else {
        return None;
    };
    if op != "!=" {
        return None;
    }
    match (x.as_ident(), y.as_ident()) {
        (Some(name), Some("nil")) => Some(name),
        (Some("nil"), Some(name)) => Some(name),
        _ => None,
    }
}

/// `nil`, `false`, `0`, `0.0`, `""`, or `T{}`.
fn is_zero_value(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(name) => name == "nil" || name == "false",
        Expr::BasicLit { kind, value } => match kind {
            LitKind::Int => value == "0",
            LitKind::Float => is_zero_float(value),
            LitKind::String => value == "\"\"" || value == "``",
            LitKind::Imag | LitKind::Char => false,
        },
        Expr::CompositeLit { elements, .. } => elements.is_empty(),
        _ => false,
    }
}

fn is_zero_float(literal: &str) -> bool {
    let digits: String = literal.chars().filter(|c| *c != '_').collect();
    let hex = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X"));
    match hex {
        // Zero mantissa with any binary exponent.
        Some(rest) => {
            let mantissa = rest.split(['p', 'P']).next().unwrap_or_default();
            mantissa.chars().any(|c| c == '0') && mantissa.chars().all(|c| c == '0' || c == '.')
        }
        None => digits.parse::<f64>().map(|v| v == 0.0).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::first_if;

    fn guard(code: &str) -> bool {
        let src = format!(
            "package p\n\nfunc f() (int, error) {{\n{}\nreturn 0, nil\n}}\n",
            code
        );
        is_error_guard(&first_if(&src))
    }

    #[test]
    fn test_recognized_guards() {
        assert!(guard("if err != nil { return err }"));
        assert!(guard("if err != nil { return nil, err }"));
        assert!(guard("if err := doSomething(); err != nil { return nil, err }"));
        assert!(guard(r#"if err != nil { return nil, fmt.Errorf("failed: %w", err) }"#));
        assert!(guard("if err != nil { return MyStruct{}, err }"));
        assert!(guard("if err != nil { return 0, err }"));
        assert!(guard(r#"if err != nil { return "", err }"#));
        assert!(guard("if err != nil { return ``, err }"));
        assert!(guard("if err != nil { return false, err }"));
        assert!(guard("if err != nil { return 0.0, err }"));
        assert!(guard("if err != nil { return 0., err }"));
        assert!(guard("if nil != err { return err }"));
        assert!(guard("if e != nil { return 0, e }"));
        assert!(guard("if err != nil { return nil, nil, wrap(err) }"));
    }

    #[test]
    fn test_rejected_shapes() {
        assert!(!guard("if err != nil { log.Print(err); return err }"));
        assert!(!guard("if x > 0 { return nil, err }"));
        assert!(!guard("if err != nil { return result, err }"));
        assert!(!guard("if err != nil { return err } else { return nil }"));
        assert!(!guard("if err != nil { panic(err) }"));
        assert!(!guard("if err != nil { return }"));
    }

    #[test]
    fn test_rejected_near_misses() {
        // Wrong identifier returned.
        assert!(!guard("if err != nil { return nil, other }"));
        // Equality instead of inequality.
        assert!(!guard("if err == nil { return nil, err }"));
        // Selector on the left of the comparison.
        assert!(!guard("if s.err != nil { return s.err }"));
        // Non-zero literals.
        assert!(!guard("if err != nil { return 1, err }"));
        assert!(!guard(r#"if err != nil { return "x", err }"#));
        assert!(!guard("if err != nil { return true, err }"));
        assert!(!guard("if err != nil { return MyStruct{A: 1}, err }"));
        // Parenthesized condition is not a binary expression.
        assert!(!guard("if (err != nil) { return err }"));
    }

    #[test]
    fn test_zero_float_literals() {
        for zero in ["0.0", "0.", ".0", "0e0", "00.0", "0_0.0", "0x0p0", "0x0.0p1", "0X.0P-3", "0x_0p0"] {
            assert!(is_zero_float(zero), "{} should be zero", zero);
        }
        for non_zero in ["1.0", "0.5", "1e-9", "0x1p0", "0x0.8p1", "0xp0"] {
            assert!(!is_zero_float(non_zero), "{} should not be zero", non_zero);
        }
        assert!(guard("if err != nil { return 0x0p0, err }"));
    }
}
