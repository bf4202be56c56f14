//! Formal parameter count.

use crate::syntax::ParamGroup;

/// `func(a, b int, c string)` has 3 parameters in 2 groups. An unnamed group
/// counts as one. The receiver is never part of `params`.
pub fn count(params: &[ParamGroup]) -> usize {
    params.iter().map(|group| group.names.len().max(1)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::function;

    fn params_of(signature: &str) -> usize {
        let src = format!("package p\n\ntype T struct{{}}\n\n{} {{}}\n", signature);
        let file = crate::test_utils::parse(&src);
        count(&file.functions[0].params)
    }

    #[test]
    fn test_counts() {
        assert_eq!(params_of("func f()"), 0);
        assert_eq!(params_of("func f(a int)"), 1);
        assert_eq!(params_of("func f(a, b, c, d int)"), 4);
        assert_eq!(params_of("func f(a int, b ...string)"), 2);
    }

    #[test]
    fn test_grouped_and_unnamed() {
        assert_eq!(params_of("func f(a, b int, c string, d, e bool)"), 5);
        assert_eq!(params_of("func f(int, string, bool, float64, error)"), 5);
        assert_eq!(params_of("func f(a int, b string, c, d, e bool)"), 5);
    }

    #[test]
    fn test_receiver_excluded() {
        assert_eq!(params_of("func (t *T) m(a, b, c, d int)"), 4);
    }

    #[test]
    fn test_function_typed_parameter_counts_once() {
        let func = function(
            "package p\n\nfunc f(cb func(a, b, c int) error, n int) {}\n",
            "f",
        );
        assert_eq!(count(&func.params), 2);
    }
}
