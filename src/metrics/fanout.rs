//! Fan-out: number of distinct functions and methods a function calls.

use std::collections::HashSet;
use std::hash::Hash;

use crate::syntax::walk::{inspect, Node};
use crate::syntax::{Block, Expr};

/// What a call's callee refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee<S> {
    /// Nothing known about the target (methods on values of unknown type,
    /// indexed or parenthesized callees).
    Unresolved,
    /// A language builtin such as `len` or `append`.
    Builtin,
    /// A type: the call is a conversion.
    TypeName,
    /// A function or method. `package` is the import path of the package
    /// declaring it, if known.
    Object { symbol: S, package: Option<String> },
}

/// Maps callee expressions to symbols.
///
/// Fan-out only needs the handle to be comparable, never its contents.
pub trait SymbolResolver {
    type Symbol: Eq + Hash;

    fn resolve(&self, callee: &Expr) -> Callee<Self::Symbol>;
}

/// Standard library import paths contain no dot (`fmt`, `net/http`).
pub fn is_stdlib(package_path: &str) -> bool {
    !package_path.contains('.')
}

/// Count distinct non-builtin, non-stdlib call targets in `body`.
pub fn fan_out<R: SymbolResolver>(body: &Block, resolver: &R) -> usize {
    let mut seen: HashSet<R::Symbol> = HashSet::new();

    inspect(body, &mut |node| {
        let Node::Expr(Expr::Call { fun, .. }) = node else {
            return true;
        };
        if !matches!(fun.as_ref(), Expr::Ident(_) | Expr::Selector { .. }) {
            return true;
        }
        if let Callee::Object { symbol, package } = resolver.resolve(fun) {
            let stdlib = package.as_deref().is_some_and(is_stdlib);
            if !stdlib {
                seen.insert(symbol);
            }
        }
        true
    });

    seen.len()
}
